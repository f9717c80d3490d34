//! The dynamic value universe carried by futures.
//!
//! A future settles with "any value", which includes other futures and
//! foreign objects that merely look like one (thenables). [`Value`] is the
//! closed set of shapes the runtime knows how to inspect:
//!
//! - plain data (`Undefined`, `Null`, `Bool`, `Number`, `Str`, `List`),
//! - [`Object`] and [`Function`], the two shapes that may expose a `then`
//!   member and therefore take part in thenable adoption,
//! - [`Future`], adopted directly,
//! - [`FutureError`], failures raised by the runtime itself.

mod function;
mod object;

pub use function::Function;
pub use object::{Members, Object, Record};

use crate::error::FutureError;
use crate::future::Future;

use std::fmt;

/// A dynamically typed value.
///
/// Data variants compare structurally. `Object`, `Function` and `Future`
/// compare by identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<Value>),
    Object(Object),
    Function(Function),
    Future(Future),
    Error(FutureError),
}

impl Value {
    /// Short lowercase name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Future(_) => "future",
            Value::Error(_) => "error",
        }
    }

    /// Returns `true` for [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns `true` for [`Value::Function`].
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// The number, if this is a [`Value::Number`].
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The items, if this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The object, if this is a [`Value::Object`].
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The function, if this is a [`Value::Function`].
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// The future, if this is a [`Value::Future`].
    pub fn as_future(&self) -> Option<&Future> {
        match self {
            Value::Future(future) => Some(future),
            _ => None,
        }
    }

    /// The error, if this is a [`Value::Error`].
    pub fn as_error(&self) -> Option<&FutureError> {
        match self {
            Value::Error(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            // Integral numbers print without a fractional part.
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object]"),
            Value::Function(_) => f.write_str("[function]"),
            Value::Future(future) => write!(f, "[future #{}]", future.id()),
            Value::Error(error) => write!(f, "{error}"),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(i32, i64, u32, u64, usize, f32, f64);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(Object::new(record))
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl From<Future> for Value {
    fn from(future: Future) -> Self {
        Value::Future(future)
    }
}

impl From<&Future> for Value {
    fn from(future: &Future) -> Self {
        Value::Future(future.clone())
    }
}
