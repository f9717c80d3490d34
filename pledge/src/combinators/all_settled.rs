use super::lift_all;
use crate::future::Future;
use crate::runtime::Runtime;
use crate::value::{Function, Record, Value};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

impl Future {
    /// Waits for every input to settle, whatever the outcome.
    ///
    /// Fulfills with a list of records in input order:
    /// `{status: "fulfilled", value}` or `{status: "rejected", reason}`.
    /// Never rejects.
    pub fn all_settled<I>(runtime: &Runtime, futures: I) -> Future
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let inputs = lift_all(runtime, futures);

        Future::new(runtime, move |resolve, _| {
            if inputs.is_empty() {
                resolve.resolve(Value::List(Vec::new()));
                return;
            }

            let slots = Rc::new(RefCell::new(vec![Value::Undefined; inputs.len()]));
            let remaining = Rc::new(Cell::new(inputs.len()));

            for (index, input) in inputs.iter().enumerate() {
                let record = {
                    let slots = slots.clone();
                    let remaining = remaining.clone();
                    let resolve = resolve.clone();
                    Rc::new(move |outcome: Record| {
                        slots.borrow_mut()[index] = outcome.into();
                        remaining.set(remaining.get() - 1);

                        if remaining.get() == 0 {
                            let outcomes = slots.borrow_mut().drain(..).collect();
                            resolve.resolve(Value::List(outcomes));
                        }
                    })
                };

                let on_fulfilled = {
                    let record = record.clone();
                    Function::unary(move |value| {
                        record(Record::new().with("status", "fulfilled").with("value", value));
                        Ok(Value::Undefined)
                    })
                };
                let on_rejected = Function::unary(move |reason| {
                    record(Record::new().with("status", "rejected").with("reason", reason));
                    Ok(Value::Undefined)
                });

                input.then(Some(on_fulfilled), Some(on_rejected));
            }
        })
    }
}
