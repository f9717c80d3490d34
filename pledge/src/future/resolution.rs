use super::core::Future;
use super::settle;
use crate::value::{Function, Value};

use tracing::trace;

/// How a fulfillment value is settled.
pub(crate) enum Resolution {
    /// The value is the future being resolved.
    SelfReference,

    /// Another future of this runtime; adopt its outcome.
    Native(Future),

    /// A foreign object or function with a callable `then`.
    Thenable(Function),

    /// Anything else, including objects without a callable `then`.
    Plain(Value),
}

/// Decides how `value` settles `future`.
///
/// `Err` carries the value raised while reading a `then` member.
pub(crate) fn classify(future: &Future, value: Value) -> Result<Resolution, Value> {
    let then = match &value {
        Value::Future(other) if other.ptr_eq(future) => return Ok(Resolution::SelfReference),
        Value::Future(other) => return Ok(Resolution::Native(other.clone())),
        Value::Object(object) => Some(object.get("then")?),
        Value::Function(function) => Some(function.get("then")?),
        _ => None,
    };

    match then {
        Some(Value::Function(then)) => Ok(Resolution::Thenable(then)),
        _ => Ok(Resolution::Plain(value)),
    }
}

/// Drives `future` through a foreign `then`.
///
/// The callbacks handed to `then` share a latch, so only the first call of
/// either one, over every invocation, has effect. A raise after one of them
/// fired is ignored.
pub(crate) fn follow_thenable(future: &Future, then: &Function) {
    trace!(future = future.id(), "following thenable");

    let (resolver, rejecter) = settle::pair(future);
    let args = [
        resolver.into_function().into(),
        rejecter.clone().into_function().into(),
    ];

    if let Err(raised) = then.call(&args) {
        rejecter.reject(raised);
    }
}
