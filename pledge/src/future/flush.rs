use super::core::{Future, Reaction};
use super::state::Settled;
use crate::runtime::Runtime;
use crate::value::Value;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use tracing::trace;

/// A reaction paired with the outcome it receives.
pub(crate) struct Delivery {
    outcome: Settled,
    reaction: Reaction,
}

impl Delivery {
    pub(crate) fn new(outcome: Settled, reaction: Reaction) -> Self {
        Self { outcome, reaction }
    }
}

/// Deliveries waiting for a flush pass, in the order they became ready.
pub(crate) struct Worklist {
    queue: RefCell<VecDeque<Delivery>>,

    /// A pass is currently delivering reactions.
    active: Cell<bool>,

    /// A pass was handed to the scheduler and has not started yet.
    scheduled: Cell<bool>,
}

impl Worklist {
    pub(crate) fn new() -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            active: Cell::new(false),
            scheduled: Cell::new(false),
        }
    }

    fn pop(&self) -> Option<Delivery> {
        self.queue.borrow_mut().pop_front()
    }

    fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

/// Marks a pass as running.
///
/// On drop the flag is cleared and, if deliveries are left over (the flush
/// limit was hit or a callback panicked), another pass is requested.
struct Pass<'a> {
    runtime: &'a Runtime,
}

impl<'a> Pass<'a> {
    fn enter(runtime: &'a Runtime) -> Self {
        runtime.worklist().active.set(true);
        Pass { runtime }
    }
}

impl Drop for Pass<'_> {
    fn drop(&mut self) {
        let worklist = self.runtime.worklist();
        worklist.active.set(false);

        if !worklist.is_empty() && !worklist.scheduled.get() {
            trace!(remaining = worklist.len(), "flush pass yielded");
            request_pass(self.runtime);
        }
    }
}

/// Queues deliveries behind everything already waiting.
///
/// Inside a running pass they simply join the worklist and are reached
/// after the current callback returns. Otherwise a pass is requested from
/// the scheduler, at most one at a time.
pub(crate) fn schedule(runtime: &Runtime, deliveries: impl IntoIterator<Item = Delivery>) {
    let worklist = runtime.worklist();
    worklist.queue.borrow_mut().extend(deliveries);

    if worklist.is_empty() || worklist.active.get() || worklist.scheduled.get() {
        return;
    }

    request_pass(runtime);
}

fn request_pass(runtime: &Runtime) {
    runtime.worklist().scheduled.set(true);

    let weak = runtime.downgrade();
    runtime.schedule_deferred(Box::new(move || {
        if let Some(runtime) = weak.upgrade() {
            run_pass(&runtime);
        }
    }));
}

/// Delivers reactions until the worklist is empty or the flush limit is hit.
fn run_pass(runtime: &Runtime) {
    let worklist = runtime.worklist();
    worklist.scheduled.set(false);

    // A host drove its queue from inside a reaction; the outer pass owns the worklist.
    if worklist.active.get() {
        return;
    }

    let _pass = Pass::enter(runtime);
    let limit = runtime.flush_limit();
    let mut delivered = 0usize;

    trace!(queued = worklist.len(), "flush pass started");

    while delivered < limit {
        let Some(delivery) = worklist.pop() else {
            break;
        };

        deliver(delivery);
        delivered += 1;
    }

    trace!(delivered, "flush pass finished");
}

/// Runs one reaction against its parent's outcome.
fn deliver(delivery: Delivery) {
    let Delivery { outcome, reaction } = delivery;
    let Reaction {
        on_fulfilled,
        on_rejected,
        derived,
    } = reaction;

    match outcome {
        Settled::Fulfilled(value) => match on_fulfilled {
            Some(handler) => complete(&derived, handler.call(&[value])),
            None => derived.fulfill_with(value),
        },
        Settled::Rejected(reason) => match on_rejected {
            Some(handler) => complete(&derived, handler.call(&[reason])),
            None => derived.reject_with(reason),
        },
    }
}

fn complete(derived: &Future, result: Result<Value, Value>) {
    match result {
        Ok(value) => derived.resolve_with(value),
        Err(raised) => derived.reject_with(raised),
    }
}
