#![allow(dead_code)]

use pledge::{Function, Value};

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::filter::LevelFilter;

/// Routes runtime traces to the test output. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(LevelFilter::TRACE)
        .try_init();
}

/// A callback adding `n` to a numeric argument.
pub fn add(n: f64) -> Function {
    Function::unary(move |value| match value.as_number() {
        Some(x) => Ok(Value::from(x + n)),
        None => Err(Value::from(format!("not a number: {value}"))),
    })
}

/// Shared log of callback invocations.
#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// A callback that records `tag:<arg>` and returns its argument.
    pub fn recorder(&self, tag: &str) -> Function {
        let log = self.clone();
        let tag = tag.to_owned();
        Function::unary(move |value| {
            log.push(format!("{tag}:{value}"));
            Ok(value)
        })
    }
}
