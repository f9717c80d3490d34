//! Combinators over collections of futures.
//!
//! Each combinator is built only on the public contract of [`Future`]:
//! it creates one future with [`Future::new`] and chains every input with
//! [`Future::then`]. Inputs that are not futures are lifted with
//! [`Future::resolve`] first.
//!
//! - [`Future::all`]: every input fulfilled, or the first rejection.
//! - [`Future::all_settled`]: every input settled, never rejects.
//! - [`Future::race`]: the first input to settle.

mod all;
mod all_settled;
mod race;

use crate::future::Future;
use crate::runtime::Runtime;
use crate::value::Value;

/// Turns a combinator input into a future to chain on.
///
/// Futures are used as-is so that chaining costs no extra pass.
fn lift(runtime: &Runtime, input: Value) -> Future {
    match input {
        Value::Future(future) => future,
        other => Future::resolve(runtime, other),
    }
}

/// Collects inputs into futures, preserving order.
fn lift_all<I>(runtime: &Runtime, inputs: I) -> Vec<Future>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    inputs
        .into_iter()
        .map(|input| lift(runtime, input.into()))
        .collect()
}
