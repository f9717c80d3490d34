use super::flush::{self, Delivery};
use super::resolution::{self, Resolution};
use super::settle::{self, Deferred, Rejecter, Resolver};
use super::state::{Settled, State};
use crate::error::FutureError;
use crate::runtime::{InitializerErrors, Runtime, WeakRuntime};
use crate::value::{Function, Value};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

/// One registered pair of continuations and the future they feed.
///
/// Created by [`Future::then`] and consumed exactly once by the flush pass.
pub(crate) struct Reaction {
    pub(crate) on_fulfilled: Option<Function>,
    pub(crate) on_rejected: Option<Function>,
    pub(crate) derived: Future,
}

struct Inner {
    /// Creation index, unique within the runtime.
    id: u64,

    state: State,

    /// Reactions registered while pending, in registration order.
    reactions: VecDeque<Reaction>,

    runtime: WeakRuntime,
}

/// A single-assignment container for the eventual outcome of an operation.
///
/// `Future` is a shared handle: clones refer to the same underlying state.
/// Reactions registered with [`then`](Self::then) never run inside the call
/// that registers them or inside the call that settles the future; they are
/// delivered later by a flush pass driven by the runtime's scheduler.
#[derive(Clone)]
pub struct Future {
    inner: Rc<RefCell<Inner>>,
}

impl Future {
    /// Allocates a pending future with no initializer.
    pub(crate) fn pending(runtime: &Runtime) -> Self {
        Self::pending_on(runtime.downgrade())
    }

    fn pending_on(runtime: WeakRuntime) -> Self {
        let id = runtime.next_id();
        trace!(future = id, "created");

        Self {
            inner: Rc::new(RefCell::new(Inner {
                id,
                state: State::Pending,
                reactions: VecDeque::new(),
                runtime,
            })),
        }
    }

    /// Like [`Future::resolve`], for callers holding only a weak handle.
    fn resolved_on(runtime: &WeakRuntime, value: Value) -> Self {
        let future = Self::pending_on(runtime.clone());
        future.resolve_with(value);
        future
    }

    /// Creates a future and runs `initializer` synchronously, exactly once.
    ///
    /// The initializer receives the two settlement callbacks. Only the first
    /// call across the pair has any effect.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let future = Future::new(&runtime, |resolve, _reject| resolve.resolve(42));
    /// ```
    pub fn new<F>(runtime: &Runtime, initializer: F) -> Self
    where
        F: FnOnce(Resolver, Rejecter),
    {
        let future = Self::pending(runtime);
        let (resolver, rejecter) = settle::pair(&future);

        initializer(resolver, rejecter);
        future
    }

    /// Creates a future from an initializer that may raise.
    ///
    /// What happens to a raised value depends on the runtime configuration:
    /// with [`InitializerErrors::Reject`] it rejects the future (unless the
    /// initializer already settled it); with [`InitializerErrors::Propagate`]
    /// it is returned to the caller and the future is discarded.
    pub fn try_new<F>(runtime: &Runtime, initializer: F) -> Result<Self, FutureError>
    where
        F: FnOnce(Resolver, Rejecter) -> Result<(), Value>,
    {
        let future = Self::pending(runtime);
        let (resolver, rejecter) = settle::pair(&future);

        if let Err(reason) = initializer(resolver, rejecter.clone()) {
            match runtime.initializer_errors() {
                InitializerErrors::Reject => rejecter.reject(reason),
                InitializerErrors::Propagate => {
                    return Err(FutureError::InitializerRaised(Box::new(reason)));
                }
            }
        }

        Ok(future)
    }

    /// Creates a future from a dynamic initializer value.
    ///
    /// The function is called with `[resolve, reject]` as two
    /// [`Value::Function`]s.
    ///
    /// # Errors
    ///
    /// Returns [`FutureError::InvalidInitializer`] if `initializer` is not a
    /// function, and [`FutureError::InitializerRaised`] as described in
    /// [`try_new`](Self::try_new).
    pub fn construct(runtime: &Runtime, initializer: &Value) -> Result<Self, FutureError> {
        let Value::Function(function) = initializer else {
            return Err(FutureError::InvalidInitializer {
                found: initializer.type_name(),
            });
        };

        Self::try_new(runtime, |resolve, reject| {
            let args = [resolve.into_function().into(), reject.into_function().into()];
            function.call(&args).map(drop)
        })
    }

    /// Returns a future resolved with `value`.
    ///
    /// If `value` is a future or a thenable, the returned future adopts its
    /// outcome instead of wrapping it.
    pub fn resolve(runtime: &Runtime, value: impl Into<Value>) -> Self {
        Self::new(runtime, |resolve, _| resolve.resolve(value))
    }

    /// Returns a future rejected with `reason`.
    pub fn reject(runtime: &Runtime, reason: impl Into<Value>) -> Self {
        Self::new(runtime, |_, reject| reject.reject(reason))
    }

    /// Returns a pending future together with its settlement callbacks.
    pub fn deferred(runtime: &Runtime) -> Deferred {
        let future = Self::pending(runtime);
        let (resolver, rejecter) = settle::pair(&future);

        Deferred {
            future,
            resolver,
            rejecter,
        }
    }

    /// Registers continuations and returns the future they feed.
    ///
    /// The returned future is always pending at return time. An absent
    /// callback passes the outcome through unchanged. A callback that raises
    /// rejects the derived future with the raised value; a returned value
    /// resolves it, adopting futures and thenables.
    pub fn then(&self, on_fulfilled: Option<Function>, on_rejected: Option<Function>) -> Future {
        let handle = self.handle();
        let derived = Future::pending_on(handle.clone());
        let reaction = Reaction {
            on_fulfilled,
            on_rejected,
            derived: derived.clone(),
        };

        let ready = {
            let mut inner = self.inner.borrow_mut();
            match inner.state.settled() {
                Some(outcome) => Some(Delivery::new(outcome, reaction)),
                None => {
                    inner.reactions.push_back(reaction);
                    None
                }
            }
        };

        // Already settled: deliver on a later pass, never from here.
        if let Some(delivery) = ready {
            self.dispatch(&handle, vec![delivery]);
        }

        derived
    }

    /// Like [`then`](Self::then), but accepts arbitrary values.
    ///
    /// Anything that is not a [`Value::Function`] counts as absent.
    pub fn then_values(&self, on_fulfilled: &Value, on_rejected: &Value) -> Future {
        self.then(
            on_fulfilled.as_function().cloned(),
            on_rejected.as_function().cloned(),
        )
    }

    /// Registers a rejection handler only. Same as `then(None, Some(on_rejected))`.
    pub fn catch(&self, on_rejected: Function) -> Future {
        self.then(None, Some(on_rejected))
    }

    /// Runs `on_finally` with no arguments once this future settles.
    ///
    /// The derived future keeps this future's outcome, unless `on_finally`
    /// raises or returns something that rejects, in which case that reason
    /// wins. A returned future or thenable is waited on before passing the
    /// outcome along.
    pub fn finally(&self, on_finally: Function) -> Future {
        let handle = self.handle();

        let on_fulfilled = {
            let handle = handle.clone();
            let on_finally = on_finally.clone();
            Function::unary(move |value| {
                let waited = Future::resolved_on(&handle, on_finally.call(&[])?);
                let restore = Function::unary(move |_| Ok(value.clone()));
                Ok(waited.then(Some(restore), None).into())
            })
        };

        let on_rejected = Function::unary(move |reason| {
            let waited = Future::resolved_on(&handle, on_finally.call(&[])?);
            let restore = Function::unary(move |_| Err(reason.clone()));
            Ok(waited.then(Some(restore), None).into())
        });

        self.then(Some(on_fulfilled), Some(on_rejected))
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> State {
        self.inner.borrow().state.clone()
    }

    /// Returns `true` until the future settles.
    pub fn is_pending(&self) -> bool {
        self.inner.borrow().state.is_pending()
    }

    /// Returns `true` once the future fulfilled.
    pub fn is_fulfilled(&self) -> bool {
        self.inner.borrow().state.is_fulfilled()
    }

    /// Returns `true` once the future rejected.
    pub fn is_rejected(&self) -> bool {
        self.inner.borrow().state.is_rejected()
    }

    /// The fulfillment value, if fulfilled.
    pub fn value(&self) -> Option<Value> {
        match &self.inner.borrow().state {
            State::Fulfilled(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// The rejection reason, if rejected.
    pub fn reason(&self) -> Option<Value> {
        match &self.inner.borrow().state {
            State::Rejected(reason) => Some(reason.clone()),
            _ => None,
        }
    }

    /// Creation index of this future within its runtime.
    pub fn id(&self) -> u64 {
        self.inner.borrow().id
    }

    /// The runtime this future was created on.
    ///
    /// Returns `None` once every handle to that runtime has been dropped.
    /// Such a future keeps its state but never delivers reactions again.
    pub fn runtime(&self) -> Option<Runtime> {
        self.handle().upgrade()
    }

    fn handle(&self) -> WeakRuntime {
        self.inner.borrow().runtime.clone()
    }

    /// Returns `true` if both handles refer to the same future.
    pub fn ptr_eq(&self, other: &Future) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The resolution procedure.
    ///
    /// Self-references reject, futures are adopted, thenables are followed
    /// and everything else fulfills.
    pub(crate) fn resolve_with(&self, value: Value) {
        if !self.is_pending() {
            return;
        }

        match resolution::classify(self, value) {
            Ok(Resolution::SelfReference) => {
                debug!(future = self.id(), "resolved with itself");
                self.reject_with(FutureError::SelfResolution.into());
            }
            Ok(Resolution::Native(target)) => self.adopt(&target),
            Ok(Resolution::Thenable(then)) => resolution::follow_thenable(self, &then),
            Ok(Resolution::Plain(value)) => self.fulfill_with(value),
            Err(raised) => self.reject_with(raised),
        }
    }

    /// Fulfills without inspecting `value`.
    pub(crate) fn fulfill_with(&self, value: Value) {
        self.settle(Settled::Fulfilled(value));
    }

    pub(crate) fn reject_with(&self, reason: Value) {
        self.settle(Settled::Rejected(reason));
    }

    /// Makes this future mirror `target`.
    fn adopt(&self, target: &Future) {
        trace!(future = self.id(), target = target.id(), "adopting");

        match target.state() {
            State::Pending => {
                let on_fulfilled = {
                    let source = self.clone();
                    Function::unary(move |value| {
                        source.resolve_with(value);
                        Ok(Value::Undefined)
                    })
                };
                let on_rejected = {
                    let source = self.clone();
                    Function::unary(move |reason| {
                        source.reject_with(reason);
                        Ok(Value::Undefined)
                    })
                };

                target.then(Some(on_fulfilled), Some(on_rejected));
            }
            State::Fulfilled(value) => self.resolve_with(value),
            State::Rejected(reason) => self.reject_with(reason),
        }
    }

    /// The write-once transition. No-op unless pending.
    fn settle(&self, outcome: Settled) {
        let (handle, reactions) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state.is_settled() {
                return;
            }

            inner.state = outcome.clone().into();
            (inner.runtime.clone(), std::mem::take(&mut inner.reactions))
        };

        let rejected = matches!(outcome, Settled::Rejected(_));
        trace!(future = self.id(), rejected, reactions = reactions.len(), "settled");

        if reactions.is_empty() {
            if rejected {
                debug!(future = self.id(), "rejected with no reactions attached");
            }
            return;
        }

        let deliveries = reactions
            .into_iter()
            .map(|reaction| Delivery::new(outcome.clone(), reaction))
            .collect();
        self.dispatch(&handle, deliveries);
    }

    /// Hands ready reactions to the runtime's worklist.
    fn dispatch(&self, handle: &WeakRuntime, deliveries: Vec<Delivery>) {
        match handle.upgrade() {
            Some(runtime) => flush::schedule(&runtime, deliveries),
            None => debug!(
                future = self.id(),
                dropped = deliveries.len(),
                "runtime is gone, reactions dropped"
            ),
        }
    }
}

impl PartialEq for Future {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Future {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Future")
                .field("id", &inner.id)
                .field("state", &inner.state)
                .field("reactions", &inner.reactions.len())
                .finish(),
            Err(_) => f.debug_struct("Future").finish_non_exhaustive(),
        }
    }
}
