use super::core::Future;
use crate::value::{Function, Value};

use std::cell::Cell;
use std::rc::Rc;

/// Shared one-shot flag for a resolver/rejecter pair.
#[derive(Clone, Default)]
struct Latch(Rc<Cell<bool>>);

impl Latch {
    /// Returns `true` for the first caller only.
    fn fire(&self) -> bool {
        !self.0.replace(true)
    }
}

/// Creates a fresh resolver/rejecter pair bound to `future`.
pub(crate) fn pair(future: &Future) -> (Resolver, Rejecter) {
    let latch = Latch::default();

    (
        Resolver {
            future: future.clone(),
            latch: latch.clone(),
        },
        Rejecter {
            future: future.clone(),
            latch,
        },
    )
}

/// The fulfilling half of a settlement pair.
///
/// Resolving runs the full resolution procedure, so resolving with another
/// future or a thenable makes the target adopt its outcome.
#[derive(Clone)]
pub struct Resolver {
    future: Future,
    latch: Latch,
}

impl Resolver {
    /// Resolves the bound future, unless this pair was already used.
    pub fn resolve(&self, value: impl Into<Value>) {
        if self.latch.fire() {
            self.future.resolve_with(value.into());
        }
    }

    /// Converts into a callable value, for handing to dynamic code.
    pub fn into_function(self) -> Function {
        Function::unary(move |value| {
            self.resolve(value);
            Ok(Value::Undefined)
        })
    }
}

/// The rejecting half of a settlement pair.
#[derive(Clone)]
pub struct Rejecter {
    future: Future,
    latch: Latch,
}

impl Rejecter {
    /// Rejects the bound future, unless this pair was already used.
    pub fn reject(&self, reason: impl Into<Value>) {
        if self.latch.fire() {
            self.future.reject_with(reason.into());
        }
    }

    /// Converts into a callable value, for handing to dynamic code.
    pub fn into_function(self) -> Function {
        Function::unary(move |reason| {
            self.reject(reason);
            Ok(Value::Undefined)
        })
    }
}

/// A pending future with its settlement callbacks exposed.
///
/// Returned by [`Future::deferred`].
pub struct Deferred {
    pub future: Future,
    pub resolver: Resolver,
    pub rejecter: Rejecter,
}
