use super::builder::{Config, InitializerErrors, RuntimeBuilder};
use super::queue::{Job, JobQueue, Scheduler};
use crate::future::flush::Worklist;

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

struct Shared {
    /// Where deferred work goes: the host's scheduler or `queue`.
    scheduler: Box<dyn Scheduler>,

    /// The runtime's own job queue, drained by `run_until_idle`.
    queue: Rc<JobQueue>,

    config: Config,

    worklist: Worklist,

    /// Shared with every [`WeakRuntime`] so futures can be numbered after
    /// the runtime is gone.
    next_id: Rc<Cell<u64>>,
}

/// The runtime handle.
///
/// `Runtime` carries everything futures need beyond their own state:
/// - the injected deferred-execution primitive,
/// - the worklist of reactions waiting for a flush pass,
/// - the configuration chosen through [`RuntimeBuilder`],
/// - the creation counter used to number futures.
///
/// It is a cheap, clone-able handle. Every future keeps one, and futures
/// derived from it share the same runtime.
#[derive(Clone)]
pub struct Runtime {
    shared: Rc<Shared>,
}

impl Runtime {
    /// Creates a runtime with the default configuration.
    pub fn new() -> Self {
        RuntimeBuilder::new().build()
    }

    pub(crate) fn from_parts(scheduler: Box<dyn Scheduler>, queue: Rc<JobQueue>, config: Config) -> Self {
        Self {
            shared: Rc::new(Shared {
                scheduler,
                queue,
                config,
                worklist: Worklist::new(),
                next_id: Rc::new(Cell::new(0)),
            }),
        }
    }

    /// Runs queued jobs until none are left, including jobs scheduled while
    /// running. Returns the number of jobs run.
    ///
    /// Only the runtime's own queue is drained; with a host scheduler
    /// installed this returns `0`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let runtime = Runtime::new();
    /// let doubled = Future::resolve(&runtime, 21).then(Some(double), None);
    ///
    /// runtime.run_until_idle();
    /// assert_eq!(doubled.value(), Some(Value::from(42)));
    /// ```
    pub fn run_until_idle(&self) -> usize {
        self.shared.queue.drain()
    }

    /// Number of jobs waiting in the runtime's own queue.
    pub fn pending_jobs(&self) -> usize {
        self.shared.queue.len()
    }


    pub(crate) fn initializer_errors(&self) -> InitializerErrors {
        self.shared.config.initializer_errors
    }

    pub(crate) fn flush_limit(&self) -> usize {
        self.shared.config.flush_limit
    }

    pub(crate) fn worklist(&self) -> &Worklist {
        &self.shared.worklist
    }

    pub(crate) fn schedule_deferred(&self, job: Job) {
        self.shared.scheduler.schedule_deferred(job);
    }

    pub(crate) fn downgrade(&self) -> WeakRuntime {
        WeakRuntime {
            shared: Rc::downgrade(&self.shared),
            next_id: self.shared.next_id.clone(),
        }
    }
}

impl Default for Runtime {
    /// Same as [`Runtime::new`].
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.shared.config)
            .field("pending_jobs", &self.pending_jobs())
            .field("futures_created", &self.shared.next_id.get())
            .finish()
    }
}

/// A non-owning runtime handle.
///
/// Held by futures and scheduled jobs. The runtime owns its worklist and the
/// worklist owns futures, so this handle must stay weak.
#[derive(Clone)]
pub(crate) struct WeakRuntime {
    shared: Weak<Shared>,
    next_id: Rc<Cell<u64>>,
}

impl WeakRuntime {
    pub(crate) fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    pub(crate) fn upgrade(&self) -> Option<Runtime> {
        self.shared.upgrade().map(|shared| Runtime { shared })
    }
}
