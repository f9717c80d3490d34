use super::lift_all;
use crate::future::Future;
use crate::runtime::Runtime;
use crate::value::Value;

impl Future {
    /// Settles like whichever input settles first.
    ///
    /// An empty input never settles.
    pub fn race<I>(runtime: &Runtime, futures: I) -> Future
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let inputs = lift_all(runtime, futures);

        Future::new(runtime, move |resolve, reject| {
            for input in &inputs {
                input.then(
                    Some(resolve.clone().into_function()),
                    Some(reject.clone().into_function()),
                );
            }
        })
    }
}
