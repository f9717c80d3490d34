mod common;

use common::Log;
use pledge::{Function, Future, Job, JobQueue, Runtime, RuntimeBuilder, Scheduler, Value};

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// A host scheduler that only records jobs until told to run them.
#[derive(Default)]
struct HostLoop {
    jobs: RefCell<Vec<Job>>,
}

impl HostLoop {
    fn turn(&self) -> usize {
        let jobs = std::mem::take(&mut *self.jobs.borrow_mut());
        let ran = jobs.len();
        for job in jobs {
            job();
        }
        ran
    }
}

impl Scheduler for HostLoop {
    fn schedule_deferred(&self, job: Job) {
        self.jobs.borrow_mut().push(job);
    }
}

#[test]
fn injected_scheduler_receives_all_deferred_work() {
    let host = Rc::new(HostLoop::default());
    let rt = RuntimeBuilder::new().scheduler(host.clone()).build();
    let log = Log::new();

    let derived = Future::resolve(&rt, 1).then(Some(log.recorder("cb")), None);

    assert_eq!(rt.pending_jobs(), 0);
    assert_eq!(rt.run_until_idle(), 0);
    assert_eq!(log.len(), 0);

    assert_eq!(host.turn(), 1);

    assert_eq!(log.entries(), vec!["cb:1"]);
    assert_eq!(derived.value(), Some(Value::from(1)));
}

#[test]
fn shared_job_queue_can_be_driven_by_the_host() {
    let queue = Rc::new(JobQueue::new());
    let rt = RuntimeBuilder::new().scheduler(queue.clone()).build();

    let result = Future::resolve(&rt, 20).then(Some(common::add(22.0)), None);

    assert_eq!(queue.len(), 1);
    queue.drain();

    assert_eq!(result.value(), Some(Value::from(42)));
}

#[test]
fn one_pass_is_requested_for_many_settlements() {
    let host = Rc::new(HostLoop::default());
    let rt = RuntimeBuilder::new().scheduler(host.clone()).build();
    let log = Log::new();

    for i in 0..3 {
        Future::resolve(&rt, i).then(Some(log.recorder("r")), None);
    }

    assert_eq!(host.turn(), 1);
    assert_eq!(log.entries(), vec!["r:0", "r:1", "r:2"]);
}

#[test]
fn flush_limit_spreads_delivery_over_passes() {
    let host = Rc::new(HostLoop::default());
    let rt = RuntimeBuilder::new()
        .scheduler(host.clone())
        .flush_limit(1)
        .build();
    let log = Log::new();

    let deferred = Future::deferred(&rt);
    deferred.future.then(Some(log.recorder("a")), None);
    deferred.future.then(Some(log.recorder("b")), None);
    deferred.future.then(Some(log.recorder("c")), None);
    deferred.resolver.resolve(0);

    host.turn();
    assert_eq!(log.entries(), vec!["a:0"]);

    host.turn();
    assert_eq!(log.entries(), vec!["a:0", "b:0"]);

    while host.turn() > 0 {}
    assert_eq!(log.entries(), vec!["a:0", "b:0", "c:0"]);
}

#[test]
#[should_panic(expected = "flush_limit must be > 0")]
fn zero_flush_limit_is_rejected() {
    let _ = RuntimeBuilder::new().flush_limit(0);
}

#[pledge::test]
fn futures_flush_in_the_order_they_became_ready(rt: Runtime) {
    let log = Log::new();
    let a = Future::deferred(&rt);
    let b = Future::deferred(&rt);

    a.future
        .then(Some(log.recorder("a1")), None)
        .then(Some(log.recorder("a2")), None);
    b.future.then(Some(log.recorder("b1")), None);

    a.resolver.resolve("x");
    b.resolver.resolve("y");
    rt.run_until_idle();

    assert_eq!(log.entries(), vec!["a1:x", "b1:y", "a2:x"]);
}

#[pledge::test]
fn settlement_order_beats_registration_order(rt: Runtime) {
    let log = Log::new();
    let a = Future::deferred(&rt);
    let b = Future::deferred(&rt);

    a.future.then(Some(log.recorder("a")), None);
    b.future.then(Some(log.recorder("b")), None);

    b.resolver.resolve(2);
    a.resolver.resolve(1);
    rt.run_until_idle();

    assert_eq!(log.entries(), vec!["b:2", "a:1"]);
}

#[pledge::test]
fn then_inside_a_reaction_runs_after_it_returns(rt: Runtime) {
    let log = Log::new();
    let source = Future::resolve(&rt, "s");

    let nested_source = source.clone();
    let nested_log = log.clone();
    source.then(
        Some(Function::unary(move |value| {
            nested_source.then(Some(nested_log.recorder("nested")), None);
            nested_log.push(format!("outer:{value}"));
            // Still only our own entry: the nested reaction has not run.
            assert_eq!(nested_log.len(), 1);
            Ok(value)
        })),
        None,
    );

    rt.run_until_idle();

    assert_eq!(log.entries(), vec!["outer:s", "nested:s"]);
}

#[pledge::test]
fn panicking_callback_leaves_runtime_usable(rt: Runtime) {
    Future::resolve(&rt, 1).then(
        Some(Function::unary(|_| panic!("callback panicked"))),
        None,
    );

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| rt.run_until_idle()));
    assert!(outcome.is_err());

    let after = Future::resolve(&rt, 2).then(Some(common::add(1.0)), None);
    rt.run_until_idle();

    assert_eq!(after.value(), Some(Value::from(3)));
}

#[pledge::test]
fn runtime_counts_pending_jobs(rt: Runtime) {
    assert_eq!(rt.pending_jobs(), 0);

    Future::resolve(&rt, 1).then(None, None);
    assert_eq!(rt.pending_jobs(), 1);

    assert_eq!(rt.run_until_idle(), 1);
    assert_eq!(rt.pending_jobs(), 0);
}

#[pledge::test]
fn default_binding_is_named_runtime() {
    let future = Future::resolve(&runtime, "bound");

    runtime.run_until_idle();

    assert_eq!(future.value(), Some(Value::from("bound")));
}

#[pledge::test]
fn reaction_added_mid_pass_waits_behind_earlier_ready_work(rt: Runtime) {
    let log = Log::new();
    let parent = Future::resolve(&rt, "p");
    let sibling = Future::deferred(&rt);
    sibling.future.then(Some(log.recorder("sibling")), None);

    let again = parent.clone();
    let resolver = sibling.resolver.clone();
    let late = log.clone();
    parent.then(
        Some(Function::unary(move |value| {
            resolver.resolve("s");
            again.then(Some(late.recorder("late")), None);
            Ok(value)
        })),
        None,
    );

    rt.run_until_idle();

    assert_eq!(log.entries(), vec!["sibling:s", "late:p"]);
}

#[pledge::test]
fn deliveries_behind_a_panicking_callback_still_run(rt: Runtime) {
    let source = Future::resolve(&rt, 1);
    source.then(
        Some(Function::unary(|_| panic!("callback panicked"))),
        None,
    );
    let survivor = source.then(Some(common::add(1.0)), None);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| rt.run_until_idle()));
    assert!(outcome.is_err());
    assert_eq!(rt.pending_jobs(), 1);

    rt.run_until_idle();

    assert_eq!(survivor.value(), Some(Value::from(2)));
}

#[test]
fn dropping_an_undrained_runtime_frees_queued_reactions() {
    let token = Rc::new(());
    let watcher = Rc::downgrade(&token);

    let rt = Runtime::new();
    Future::resolve(&rt, 1).then(
        Some(Function::unary(move |value| {
            let _held = &token;
            Ok(value)
        })),
        None,
    );
    assert_eq!(rt.pending_jobs(), 1);

    drop(rt);

    assert!(watcher.upgrade().is_none());
}

#[test]
fn future_outliving_its_runtime_keeps_its_state() {
    let rt = Runtime::new();
    let future = Future::resolve(&rt, 1);
    assert!(future.runtime().is_some());

    drop(rt);

    assert!(future.runtime().is_none());
    assert_eq!(future.value(), Some(Value::from(1)));
    assert!(future.then(Some(common::add(1.0)), None).is_pending());
}
