mod utils;

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Turns a function into a test that runs against a fresh runtime.
///
/// The function may take one parameter, which is bound to a default
/// `pledge::Runtime`; without a parameter the runtime is bound to
/// `runtime`. After the body returns, the runtime is drained with
/// `run_until_idle()`.
///
/// ```rust,ignore
/// #[pledge::test]
/// fn resolves(rt: Runtime) {
///     let future = Future::resolve(&rt, 1);
///     rt.run_until_idle();
///     assert!(future.is_fulfilled());
/// }
/// ```
#[proc_macro_attribute]
pub fn test(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut tokens = item.into_iter().collect::<Vec<_>>();

    let Some(fn_pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "fn"))
    else {
        return TokenStream::new();
    };

    let Some(params_pos) = tokens[fn_pos..]
        .iter()
        .position(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Parenthesis))
        .map(|p| p + fn_pos)
    else {
        return TokenStream::new();
    };

    let params = match &tokens[params_pos] {
        TokenTree::Group(g) => utils::split_args(g.stream()),
        _ => unreachable!(),
    };

    let binding = match params.as_slice() {
        [] => String::from("runtime"),
        [param] => utils::tokens_to_string(param),
        _ => return compile_error("#[pledge::test] takes at most one runtime parameter"),
    };

    let Some(block_pos) = tokens.iter().rposition(
        |t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace),
    ) else {
        return TokenStream::new();
    };

    let block = match &tokens[block_pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let new_block = format!(
        "{{
        let __pledge_runtime = ::pledge::RuntimeBuilder::new().build();
        #[allow(unused_variables)]
        let {binding} = ::std::clone::Clone::clone(&__pledge_runtime);
        {{ {block} }};
        __pledge_runtime.run_until_idle();
    }}"
    );

    let new_block = match new_block.parse::<TokenStream>() {
        Ok(ts) => ts,
        Err(err) => return compile_error(&format!("#[pledge::test] expansion error: {err}")),
    };

    tokens[params_pos] = TokenTree::Group(Group::new(Delimiter::Parenthesis, TokenStream::new()));
    tokens[block_pos] = TokenTree::Group(Group::new(Delimiter::Brace, new_block));

    let test_attr: TokenStream = "#[test]".parse().unwrap();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(tokens);

    result.into_iter().collect()
}

fn compile_error(msg: &str) -> TokenStream {
    format!("compile_error!({msg:?});").parse().unwrap()
}
