//! The [`Target`] trait: anything a method can be resolved on by name.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use dynacall_types::{CallResult, Value};

/// A method resolved on a specific target, ready to be invoked once.
pub struct BoundMethod<'a> {
    call: Box<dyn FnOnce(Vec<Value>) -> CallResult + 'a>,
}

impl<'a> BoundMethod<'a> {
    pub fn new(call: impl FnOnce(Vec<Value>) -> CallResult + 'a) -> Self {
        Self {
            call: Box::new(call),
        }
    }

    pub fn invoke(self, args: Vec<Value>) -> CallResult {
        (self.call)(args)
    }
}

impl fmt::Debug for BoundMethod<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod").finish_non_exhaustive()
    }
}

/// An object exposing a set of methods invocable by exact, case-sensitive name.
///
/// Implementations usually forward to a static [`MethodTable`](crate::MethodTable):
///
/// ```ignore
/// impl Target for Calculator {
///     fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
///         static METHODS: LazyLock<MethodTable<Calculator>> = LazyLock::new(|| {
///             MethodTable::new()
///                 .with("Add", Calculator::add)
///                 .with("Sub", Calculator::sub)
///         });
///         METHODS.bind(self, name)
///     }
/// }
/// ```
///
/// Only names present in the table are reachable; nothing else on the type is
/// exposed.
pub trait Target {
    /// Look up `name` in this target's method set.
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>>;
}

/// A target shareable across threads, as held by dispatchers.
pub type SharedTarget = Arc<dyn Target + Send + Sync>;

impl<T: Target + ?Sized> Target for &T {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        (**self).resolve(name)
    }
}

impl<T: Target + ?Sized> Target for Box<T> {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        (**self).resolve(name)
    }
}

impl<T: Target + ?Sized> Target for Arc<T> {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        (**self).resolve(name)
    }
}

impl<T: Target + ?Sized> Target for Rc<T> {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        (**self).resolve(name)
    }
}

/// An absent target has no methods.
impl<T: Target> Target for Option<T> {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        self.as_ref().and_then(|target| target.resolve(name))
    }
}

macro_rules! no_methods {
    ($($ty:ty),*) => {$(
        impl Target for $ty {
            fn resolve(&self, _name: &str) -> Option<BoundMethod<'_>> {
                None
            }
        }
    )*};
}

// Primitive values expose nothing.
no_methods!(
    (),
    bool,
    i32,
    i64,
    u32,
    u64,
    usize,
    f32,
    f64,
    str,
    String,
    Value
);

impl<T> Target for Vec<T> {
    fn resolve(&self, _name: &str) -> Option<BoundMethod<'_>> {
        None
    }
}

impl<T> Target for BTreeMap<String, T> {
    fn resolve(&self, _name: &str) -> Option<BoundMethod<'_>> {
        None
    }
}
