mod common;

use common::{Log, add};
use pledge::{Function, Future, Runtime, Value};

use std::cell::Cell;
use std::rc::Rc;

#[pledge::test]
fn then_on_settled_future_is_deferred(rt: Runtime) {
    let called = Rc::new(Cell::new(false));

    let flag = called.clone();
    let derived = Future::resolve(&rt, 1).then(
        Some(Function::unary(move |v| {
            flag.set(true);
            Ok(v)
        })),
        None,
    );

    assert!(!called.get());
    assert!(derived.is_pending());

    rt.run_until_idle();

    assert!(called.get());
    assert_eq!(derived.value(), Some(Value::from(1)));
}

#[pledge::test]
fn settling_does_not_run_reactions_synchronously(rt: Runtime) {
    let log = Log::new();
    let deferred = Future::deferred(&rt);

    deferred.future.then(Some(log.recorder("a")), None);
    deferred.resolver.resolve(1);

    assert_eq!(log.len(), 0);
    assert_eq!(rt.pending_jobs(), 1);

    rt.run_until_idle();

    assert_eq!(log.entries(), vec!["a:1"]);
}

#[pledge::test]
fn reactions_run_in_registration_order(rt: Runtime) {
    let log = Log::new();
    let deferred = Future::deferred(&rt);

    deferred.future.then(Some(log.recorder("first")), None);
    deferred.future.then(Some(log.recorder("second")), None);
    deferred.future.then(Some(log.recorder("third")), None);

    deferred.resolver.resolve("go");
    rt.run_until_idle();

    assert_eq!(log.entries(), vec!["first:go", "second:go", "third:go"]);
}

#[pledge::test]
fn chaining_propagates_return_values(rt: Runtime) {
    let result = Future::resolve(&rt, 1)
        .then(Some(add(1.0)), None)
        .then(Some(add(1.0)), None);

    rt.run_until_idle();

    assert_eq!(result.value(), Some(Value::from(3)));
}

#[pledge::test]
fn catch_converts_rejection_to_fulfillment(rt: Runtime) {
    let recovered = Future::reject(&rt, "e").catch(Function::unary(|reason| {
        Ok(Value::from(format!("{reason}!")))
    }));

    rt.run_until_idle();

    assert_eq!(recovered.value(), Some(Value::from("e!")));
}

#[pledge::test]
fn missing_handlers_pass_outcomes_through(rt: Runtime) {
    let fulfilled = Future::resolve(&rt, 2)
        .then(None, Some(Function::unary(|_| Ok(Value::from("unused")))))
        .then(Some(add(1.0)), None);

    let rejected = Future::reject(&rt, "e")
        .then(Some(add(1.0)), None)
        .then(None, None);

    rt.run_until_idle();

    assert_eq!(fulfilled.value(), Some(Value::from(3)));
    assert_eq!(rejected.reason(), Some(Value::from("e")));
}

#[pledge::test]
fn non_callable_handlers_are_ignored(rt: Runtime) {
    let derived = Future::resolve(&rt, 4).then_values(&Value::from(1), &Value::Null);

    rt.run_until_idle();

    assert_eq!(derived.value(), Some(Value::from(4)));
}

#[pledge::test]
fn raising_callback_rejects_only_its_derived_future(rt: Runtime) {
    let log = Log::new();
    let source = Future::resolve(&rt, 1);

    let failed = source.then(Some(Function::unary(|_| Err(Value::from("bad")))), None);
    let sibling = source.then(Some(log.recorder("sibling")), None);

    rt.run_until_idle();

    assert_eq!(failed.reason(), Some(Value::from("bad")));
    assert_eq!(sibling.value(), Some(Value::from(1)));
    assert_eq!(log.entries(), vec!["sibling:1"]);
}

#[pledge::test]
fn callback_returning_future_is_adopted(rt: Runtime) {
    let inner = Future::deferred(&rt);

    let returned = inner.future.clone();
    let derived = Future::resolve(&rt, 0).then(
        Some(Function::unary(move |_| Ok(Value::from(&returned)))),
        None,
    );

    rt.run_until_idle();
    assert!(derived.is_pending());

    inner.resolver.resolve("late");
    rt.run_until_idle();

    assert_eq!(derived.value(), Some(Value::from("late")));
}

#[pledge::test]
fn rejection_handler_can_rethrow(rt: Runtime) {
    let derived = Future::reject(&rt, "e")
        .catch(Function::unary(|reason| Err(Value::from(format!("{reason}{reason}")))))
        .catch(Function::unary(Ok));

    rt.run_until_idle();

    assert_eq!(derived.value(), Some(Value::from("ee")));
}

#[pledge::test]
fn finally_keeps_the_original_outcome(rt: Runtime) {
    let calls = Rc::new(Cell::new(0));

    let on_finally = {
        let calls = calls.clone();
        Function::new(move |args| {
            assert!(args.is_empty());
            calls.set(calls.get() + 1);
            Ok(Value::from("ignored"))
        })
    };

    let fulfilled = Future::resolve(&rt, 1).finally(on_finally.clone());
    let rejected = Future::reject(&rt, "e").finally(on_finally);

    rt.run_until_idle();

    assert_eq!(calls.get(), 2);
    assert_eq!(fulfilled.value(), Some(Value::from(1)));
    assert_eq!(rejected.reason(), Some(Value::from("e")));
}

#[pledge::test]
fn finally_failure_overrides_the_outcome(rt: Runtime) {
    let raising = Future::resolve(&rt, 1).finally(Function::new(|_| Err(Value::from("raised"))));

    let inner_rt = rt.clone();
    let rejecting = Future::resolve(&rt, 1).finally(Function::new(move |_| {
        Ok(Value::from(Future::reject(&inner_rt, "returned")))
    }));

    rt.run_until_idle();

    assert_eq!(raising.reason(), Some(Value::from("raised")));
    assert_eq!(rejecting.reason(), Some(Value::from("returned")));
}

#[pledge::test]
fn finally_waits_for_returned_future(rt: Runtime) {
    let gate = Future::deferred(&rt);

    let waited = gate.future.clone();
    let derived = Future::resolve(&rt, "value")
        .finally(Function::new(move |_| Ok(Value::from(&waited))));

    rt.run_until_idle();
    assert!(derived.is_pending());

    gate.resolver.resolve(());
    rt.run_until_idle();

    assert_eq!(derived.value(), Some(Value::from("value")));
}

#[pledge::test]
fn long_chains_do_not_grow_the_stack(rt: Runtime) {
    let mut future = Future::resolve(&rt, 0);
    for _ in 0..10_000 {
        future = future.then(Some(add(1.0)), None);
    }

    rt.run_until_idle();

    assert_eq!(future.value(), Some(Value::from(10_000)));
}
