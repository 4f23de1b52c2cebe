//! Registration table mapping method names to typed handlers.

use std::collections::HashMap;
use std::fmt;

use dynacall_types::{CallResult, Value};

use crate::handler::Handler;
use crate::target::BoundMethod;

type Method<T> = Box<dyn Fn(&T, Vec<Value>) -> CallResult + Send + Sync>;

/// Error types for method registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Duplicate method registered: {name}")]
    Duplicate { name: String },
    #[error("Method name must not be empty")]
    EmptyName,
}

/// Method set of a target type `T`.
///
/// Names are matched exactly and case-sensitively. The table is immutable once
/// built and is typically kept in a `static LazyLock` per target type.
pub struct MethodTable<T: ?Sized> {
    methods: HashMap<String, Method<T>>,
}

impl<T: ?Sized + 'static> MethodTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Builder form of [`register`](Self::register).
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or already registered. Tables are built from
    /// literal names, so this is a programming error.
    pub fn with<M, H>(mut self, name: &str, handler: H) -> Self
    where
        H: Handler<T, M>,
    {
        if let Err(err) = self.register(name, handler) {
            panic!("{err}");
        }
        self
    }

    pub fn register<M, H>(&mut self, name: &str, handler: H) -> Result<(), RegistrationError>
    where
        H: Handler<T, M>,
    {
        if name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if self.methods.contains_key(name) {
            return Err(RegistrationError::Duplicate {
                name: name.to_string(),
            });
        }
        self.methods.insert(
            name.to_string(),
            Box::new(move |target: &T, args: Vec<Value>| handler.invoke(target, args)),
        );
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Resolve `name` against `target`.
    pub fn bind<'a>(&'a self, target: &'a T, name: &str) -> Option<BoundMethod<'a>> {
        let method = self.methods.get(name)?;
        Some(BoundMethod::new(move |args| method(target, args)))
    }
}

impl<T: ?Sized + 'static> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for MethodTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("len", &self.methods.len())
            .finish_non_exhaustive()
    }
}
