//! Dynamic method invocation for dynacall.
//!
//! # Architecture
//!
//! ```text
//! call(target, "Name", args)
//!   -> guard: catch_unwind {
//!        Target::resolve(name)          -- None => NoSuchMethod
//!        Handler::invoke(target, args)  -- arity check, FromValue per argument
//!        IntoResults                    -- native return => Vec<Value>
//!      }
//!   -> Result<Vec<Value>, InvocationError>
//! ```
//!
//! Targets expose methods through an explicit [`MethodTable`] of typed
//! closures; nothing outside the table is reachable. The invoker keeps no state
//! between calls, so concurrent calls are safe whenever the target's own
//! methods are.

mod guard;
mod handler;
mod table;
mod target;

pub use dynacall_types::{
    CallResult, ConversionError, FromValue, IntoResults, IntoValue, InvocationError, Value,
    ValueKind,
};
pub use guard::panic_to_error;
pub use handler::Handler;
pub use table::{MethodTable, RegistrationError};
pub use target::{BoundMethod, SharedTarget, Target};

/// Invoke `method_name` on `target` with positional `args`.
///
/// Returns `Err(NoSuchMethod)` when the target has no method with that exact
/// name, and `Err(RuntimeFailure(..))` for arity or type mismatches, errors
/// returned by the callee, and panics raised anywhere during the call.
pub fn call<T: Target + ?Sized>(target: &T, method_name: &str, args: Vec<Value>) -> CallResult {
    guard::guarded(method_name, || {
        let Some(method) = target.resolve(method_name) else {
            tracing::debug!(method = method_name, "No such method");
            return Err(InvocationError::NoSuchMethod);
        };
        method.invoke(args)
    })
}

/// Variadic form of [`call`]: each argument is converted with [`IntoValue`].
///
/// ```ignore
/// let results = invoke!(&calculator, "Add", 1.0, 2.0)?;
/// ```
#[macro_export]
macro_rules! invoke {
    ($target:expr, $method:expr $(, $arg:expr)* $(,)?) => {
        $crate::call(
            $target,
            $method,
            vec![$($crate::IntoValue::into_value($arg)),*],
        )
    };
}
