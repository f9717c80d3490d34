use super::{Object, Value};

use std::fmt;
use std::rc::Rc;

type Callable = dyn Fn(&[Value]) -> Result<Value, Value>;

/// A shared callable value.
///
/// Calling returns `Ok` with the produced value, or `Err` with the value the
/// callable raised. A function may additionally expose members through an
/// [`Object`], which is how a callable can also be a thenable.
#[derive(Clone)]
pub struct Function {
    call: Rc<Callable>,
    members: Option<Object>,
}

impl Function {
    /// Wraps a closure receiving the full argument list.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Value> + 'static,
    {
        Self {
            call: Rc::new(f),
            members: None,
        }
    }

    /// Wraps a closure that only looks at its first argument.
    ///
    /// A missing argument is passed as [`Value::Undefined`].
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, Value> + 'static,
    {
        Self::new(move |args| f(args.first().cloned().unwrap_or_default()))
    }

    /// Attaches members to this function.
    pub fn with_members(mut self, members: impl Into<Object>) -> Self {
        self.members = Some(members.into());
        self
    }

    /// Invokes the function.
    pub fn call(&self, args: &[Value]) -> Result<Value, Value> {
        (self.call)(args)
    }

    /// Reads a member. Functions without members expose nothing.
    pub fn get(&self, name: &str) -> Result<Value, Value> {
        match &self.members {
            Some(members) => members.get(name),
            None => Ok(Value::Undefined),
        }
    }

    /// Returns `true` if both handles point to the same callable.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.call, &other.call)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("members", &self.members.is_some())
            .finish_non_exhaustive()
    }
}
