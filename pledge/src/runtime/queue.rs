use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A unit of deferred work.
pub type Job = Box<dyn FnOnce()>;

/// The host's "run this later, not now" capability.
///
/// Implementations must run each job after the current call stack has
/// unwound, and must run jobs in the order they were scheduled.
pub trait Scheduler {
    /// Arranges for `job` to run later, never before this call returns.
    fn schedule_deferred(&self, job: Job);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule_deferred(&self, job: Job) {
        (**self).schedule_deferred(job);
    }
}

/// A FIFO queue of deferred jobs.
///
/// This is the runtime's default scheduler: jobs wait here until
/// [`Runtime::run_until_idle`](crate::Runtime::run_until_idle) drains them.
/// Hosts with their own event loop can also keep an `Rc<JobQueue>` and
/// drain it themselves.
#[derive(Default)]
pub struct JobQueue {
    inner: RefCell<VecDeque<Job>>,
}

impl JobQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a job to the back of the queue.
    pub fn push(&self, job: Job) {
        self.inner.borrow_mut().push_back(job);
    }

    /// Pops the oldest job. Returns `None` if the queue is empty.
    pub fn pop(&self) -> Option<Job> {
        self.inner.borrow_mut().pop_front()
    }

    /// Number of jobs waiting.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` if no job is waiting.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Runs jobs until the queue is empty, including jobs pushed by the
    /// jobs themselves. Returns how many ran.
    pub fn drain(&self) -> usize {
        let mut ran = 0;

        // The borrow ends before the job runs, so jobs may push more jobs.
        while let Some(job) = self.pop() {
            job();
            ran += 1;
        }

        ran
    }
}

impl Scheduler for JobQueue {
    fn schedule_deferred(&self, job: Job) {
        self.push(job);
    }
}
