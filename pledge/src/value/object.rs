use super::Value;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Member lookup for object-shaped values.
///
/// `get` returning `Err` models a member read that raises, which the
/// thenable procedure must turn into a rejection.
pub trait Members {
    fn get(&self, name: &str) -> Result<Value, Value>;

    /// Names of the members, for debugging. Opaque objects report none.
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A shared handle to an object.
#[derive(Clone)]
pub struct Object(Rc<dyn Members>);

impl Object {
    /// Wraps any [`Members`] implementation.
    pub fn new<M>(members: M) -> Self
    where
        M: Members + 'static,
    {
        Self(Rc::new(members))
    }

    /// Builds an object whose every member read goes through `getter`.
    pub fn from_fn<F>(getter: F) -> Self
    where
        F: Fn(&str) -> Result<Value, Value> + 'static,
    {
        Self::new(Getter(getter))
    }

    /// Reads a member. `Err` carries the value raised by the read.
    pub fn get(&self, name: &str) -> Result<Value, Value> {
        self.0.get(name)
    }

    /// Member names, for debugging output.
    pub fn keys(&self) -> Vec<String> {
        self.0.keys()
    }

    /// Returns `true` if both handles refer to the same object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for key in self.keys() {
            match self.get(&key) {
                Ok(value) => map.entry(&key, &value),
                Err(_) => map.entry(&key, &"<raised>"),
            };
        }
        map.finish()
    }
}

impl<M: Members + 'static> From<M> for Object {
    fn from(members: M) -> Self {
        Object::new(members)
    }
}

struct Getter<F>(F);

impl<F> Members for Getter<F>
where
    F: Fn(&str) -> Result<Value, Value>,
{
    fn get(&self, name: &str) -> Result<Value, Value> {
        (self.0)(name)
    }
}

/// A plain map-backed object. Missing members read as `Undefined`.
#[derive(Debug, Default)]
pub struct Record {
    fields: RefCell<BTreeMap<String, Value>>,
}

impl Record {
    /// Creates a record with no members.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Inserts or replaces a member.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.fields.borrow_mut().insert(name.to_owned(), value.into());
    }
}

impl Members for Record {
    fn get(&self, name: &str) -> Result<Value, Value> {
        Ok(self.fields.borrow().get(name).cloned().unwrap_or_default())
    }

    fn keys(&self) -> Vec<String> {
        self.fields.borrow().keys().cloned().collect()
    }
}
