use super::core::Runtime;
use super::queue::{JobQueue, Scheduler};

use std::rc::Rc;

/// What happens when a fallible initializer raises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitializerErrors {
    /// Reject the future with the raised value, unless the initializer
    /// already settled it.
    #[default]
    Reject,

    /// Return the raised value to the constructor's caller as
    /// [`FutureError::InitializerRaised`](crate::FutureError::InitializerRaised).
    Propagate,
}

/// Runtime settings fixed at build time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Config {
    pub(crate) initializer_errors: InitializerErrors,
    pub(crate) flush_limit: usize,
}

/// Builder for configuring and creating a runtime.
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .initializer_errors(InitializerErrors::Propagate)
///     .flush_limit(64)
///     .build();
/// ```
pub struct RuntimeBuilder {
    /// Host scheduler. `None` means the runtime's own job queue.
    scheduler: Option<Box<dyn Scheduler>>,

    initializer_errors: InitializerErrors,

    /// Reactions one flush pass may deliver before yielding.
    flush_limit: usize,
}

impl RuntimeBuilder {
    /// Creates a builder with the default configuration: internal job
    /// queue, rejecting initializer errors, unlimited flush passes.
    pub fn new() -> Self {
        Self {
            scheduler: None,
            initializer_errors: InitializerErrors::default(),
            flush_limit: usize::MAX,
        }
    }

    /// Injects the host's deferred-execution primitive.
    ///
    /// With a host scheduler, [`Runtime::run_until_idle`] has nothing to
    /// drain; the host runs the jobs.
    pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    /// Chooses what a raising initializer does.
    ///
    /// Defaults to [`InitializerErrors::Reject`].
    pub fn initializer_errors(mut self, policy: InitializerErrors) -> Self {
        self.initializer_errors = policy;
        self
    }

    /// Caps how many reactions a single flush pass delivers before handing
    /// the rest back to the scheduler.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn flush_limit(mut self, n: usize) -> Self {
        assert!(n > 0, "flush_limit must be > 0");

        self.flush_limit = n;
        self
    }

    /// Builds the runtime.
    ///
    /// Without a host scheduler, deferred work goes to the runtime's own
    /// [`JobQueue`], drained by [`Runtime::run_until_idle`].
    pub fn build(self) -> Runtime {
        let queue = Rc::new(JobQueue::new());
        let scheduler: Box<dyn Scheduler> = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Box::new(queue.clone()),
        };

        let config = Config {
            initializer_errors: self.initializer_errors,
            flush_limit: self.flush_limit,
        };

        Runtime::from_parts(scheduler, queue, config)
    }
}

impl Default for RuntimeBuilder {
    /// Same as [`RuntimeBuilder::new`].
    fn default() -> Self {
        Self::new()
    }
}
