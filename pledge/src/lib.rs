//! # Pledge
//!
//! **Pledge** is a deferred-value runtime for Rust following the
//! Promises/A+ resolution semantics, built for the **Nebula** ecosystem's
//! scripting and plugin layers.
//!
//! A [`Future`] is a single-assignment container for the eventual result or
//! failure of an operation. Continuations registered with [`Future::then`]
//! are always delivered later, never inside the call that registered them,
//! and always in registration order.
//!
//! Pledge is single-threaded and cooperative. It does not own an event loop:
//! every piece of deferred work goes through a [`Scheduler`] injected at
//! build time, so the same core runs under a host's microtask queue or under
//! the built-in [`JobQueue`] driven by [`Runtime::run_until_idle`].
//!
//! - **Write-once futures** with adoption of other futures and of foreign
//!   thenables
//! - **Deterministic delivery** through a FIFO flush worklist
//! - **Combinators**: [`Future::all`], [`Future::all_settled`],
//!   [`Future::race`]
//! - **Test attribute** `#[pledge::test]` that provides a runtime and drains it
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pledge::{Function, Future, Runtime, Value};
//!
//! let runtime = Runtime::new();
//!
//! let answer = Future::resolve(&runtime, 1)
//!     .then(Some(Function::unary(|v| Ok(Value::from(v.as_number().unwrap_or(0.0) + 1.0)))), None);
//!
//! // Nothing has run yet.
//! assert!(answer.is_pending());
//!
//! runtime.run_until_idle();
//! assert_eq!(answer.value(), Some(Value::from(2)));
//! ```
//!
//! ## Modules
//!
//! - [`future`]: The future core (state, settlement, adoption, flush)
//! - [`combinators`]: Aggregate futures over collections
//! - [`runtime`]: Scheduler capability, builder and runtime handle
//! - [`value`]: The dynamic value universe futures settle with

pub mod combinators;
pub mod error;
pub mod future;
pub mod runtime;
pub mod value;

pub use error::FutureError;
pub use future::{Deferred, Future, Rejecter, Resolver, State};
pub use runtime::{InitializerErrors, Job, JobQueue, Runtime, RuntimeBuilder, Scheduler};
pub use value::{Function, Members, Object, Record, Value};

pub use pledge_macros::test;
