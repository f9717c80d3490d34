//! Error types surfaced by the runtime.
//!
//! Only malformed construction is reported to the caller as an `Err`.
//! Everything else travels through the rejection channel of the future
//! involved, wrapped in [`Value::Error`] when the runtime itself is the
//! source of the failure.

use crate::value::Value;

use thiserror::Error;

/// Failures produced by the future machinery itself.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FutureError {
    /// The initializer passed to [`Future::construct`](crate::Future::construct)
    /// is not callable.
    #[error("future initializer is not callable (got {found})")]
    InvalidInitializer {
        /// Type name of the value that was supplied instead.
        found: &'static str,
    },

    /// A future was resolved with itself.
    ///
    /// Never returned to a caller; it only appears as a rejection reason.
    #[error("a future cannot be resolved with itself")]
    SelfResolution,

    /// The initializer raised and the runtime is configured with
    /// [`InitializerErrors::Propagate`](crate::InitializerErrors::Propagate).
    #[error("future initializer raised: {0}")]
    InitializerRaised(Box<Value>),
}

impl From<FutureError> for Value {
    fn from(error: FutureError) -> Self {
        Value::Error(error)
    }
}
