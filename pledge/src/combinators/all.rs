use super::lift_all;
use crate::future::Future;
use crate::runtime::Runtime;
use crate::value::{Function, Value};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

impl Future {
    /// Waits for every input to fulfill.
    ///
    /// Fulfills with a [`Value::List`] holding each input's value at the
    /// input's index, or rejects with the first rejection observed. Later
    /// settlements are ignored. An empty input fulfills with an empty list.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let both = Future::all(&runtime, [Future::resolve(&runtime, 1), Future::resolve(&runtime, 2)]);
    /// runtime.run_until_idle();
    /// assert_eq!(both.value(), Some(Value::List(vec![1.into(), 2.into()])));
    /// ```
    pub fn all<I>(runtime: &Runtime, futures: I) -> Future
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let inputs = lift_all(runtime, futures);

        Future::new(runtime, move |resolve, reject| {
            if inputs.is_empty() {
                resolve.resolve(Value::List(Vec::new()));
                return;
            }

            let slots = Rc::new(RefCell::new(vec![Value::Undefined; inputs.len()]));
            let remaining = Rc::new(Cell::new(inputs.len()));

            // `index` is bound per registration, never read from a shared counter.
            for (index, input) in inputs.iter().enumerate() {
                let on_fulfilled = {
                    let slots = slots.clone();
                    let remaining = remaining.clone();
                    let resolve = resolve.clone();
                    Function::unary(move |value| {
                        slots.borrow_mut()[index] = value;
                        remaining.set(remaining.get() - 1);

                        if remaining.get() == 0 {
                            let values = slots.borrow_mut().drain(..).collect();
                            resolve.resolve(Value::List(values));
                        }
                        Ok(Value::Undefined)
                    })
                };

                let on_rejected = {
                    let reject = reject.clone();
                    Function::unary(move |reason| {
                        reject.reject(reason);
                        Ok(Value::Undefined)
                    })
                };

                input.then(Some(on_fulfilled), Some(on_rejected));
            }
        })
    }
}
