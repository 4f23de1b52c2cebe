//! Guarded call boundary.
//!
//! Everything reachable from resolution, argument conversion and the callee
//! runs under `catch_unwind`; a panic comes back as an [`InvocationError`].
//! The call either returns its own outcome or unwinds, so a recovered panic
//! can never replace an error the call already produced.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use dynacall_types::{CallResult, InvocationError};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Run `call`, converting any panic it raises into an error value.
pub(crate) fn guarded(method_name: &str, call: impl FnOnce() -> CallResult) -> CallResult {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let error = panic_to_error(payload);
            tracing::warn!(method = method_name, %error, "Recovered panic during invocation");
            Err(error)
        }
    }
}

/// Convert a panic payload into an [`InvocationError`].
///
/// Text payloads become `RuntimeFailure(text)`, an `InvocationError` raised
/// with [`std::panic::panic_any`] is returned unchanged, and anything else
/// becomes `RuntimeFailure("Unknown error")`.
#[must_use]
pub fn panic_to_error(payload: Box<dyn Any + Send>) -> InvocationError {
    let payload = match payload.downcast::<InvocationError>() {
        Ok(error) => return *error,
        Err(payload) => payload,
    };
    if let Some(s) = payload.downcast_ref::<&str>() {
        InvocationError::runtime(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        InvocationError::runtime(s.clone())
    } else {
        InvocationError::runtime(UNKNOWN_ERROR)
    }
}
