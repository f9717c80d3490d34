//! Runtime plumbing shared by every future.
//!
//! This module contains:
//! - the [`Scheduler`] capability through which all deferred work is
//!   requested, and [`JobQueue`], the default implementation,
//! - [`RuntimeBuilder`] and its configuration knobs,
//! - [`Runtime`], the handle that ties futures to a scheduler.
//!
//! Nothing here is looked up from ambient state: a future always reaches
//! its scheduler through the runtime it was created on. Futures only hold a
//! weak handle, so once every [`Runtime`] clone is dropped, queued work is
//! freed and never delivered.

mod builder;
mod core;
mod queue;

pub use self::core::Runtime;
pub(crate) use self::core::WeakRuntime;
pub use builder::{InitializerErrors, RuntimeBuilder};
pub use queue::{Job, JobQueue, Scheduler};
