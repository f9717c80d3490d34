//! The future core.
//!
//! This module owns everything about a single future:
//! - the write-once state machine ([`State`]),
//! - the settlement callbacks handed to initializers ([`Resolver`],
//!   [`Rejecter`]),
//! - the resolution procedure, including adoption of other futures and of
//!   foreign thenables,
//! - the flush pass that delivers reactions after the current call returns.
//!
//! The combinators in [`crate::combinators`] are built on the public surface
//! of [`Future`] only.

mod core;
mod resolution;
mod settle;
mod state;

pub(crate) mod flush;

pub use self::core::Future;
pub use settle::{Deferred, Rejecter, Resolver};
pub use state::State;
