//! Error types for invocation and value conversion.

use thiserror::Error;

use crate::ValueKind;

/// Outcome of a single dynamic call.
pub type CallResult = Result<Vec<crate::Value>, InvocationError>;

/// Failure of a dynamic call.
///
/// `NoSuchMethod` means "not handled here" and lets a caller try another
/// target. `RuntimeFailure` is terminal for the attempt and only carries a
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("No such method")]
    NoSuchMethod,
    #[error("{0}")]
    RuntimeFailure(String),
}

impl InvocationError {
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::RuntimeFailure(message.into())
    }

    #[must_use]
    pub const fn is_no_such_method(&self) -> bool {
        matches!(self, Self::NoSuchMethod)
    }

    /// The failure message, if this is a runtime failure.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::NoSuchMethod => None,
            Self::RuntimeFailure(message) => Some(message),
        }
    }
}

impl From<String> for InvocationError {
    fn from(s: String) -> Self {
        InvocationError::RuntimeFailure(s)
    }
}

impl From<&str> for InvocationError {
    fn from(s: &str) -> Self {
        InvocationError::RuntimeFailure(s.to_string())
    }
}

/// A value could not be converted into the requested native type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("call using {got} as type {expected}")]
    Mismatch {
        expected: &'static str,
        got: ValueKind,
    },
    #[error("value {value} out of range for type {target}")]
    OutOfRange { value: String, target: &'static str },
}

impl ConversionError {
    pub(crate) fn mismatch(expected: &'static str, got: ValueKind) -> Self {
        Self::Mismatch { expected, got }
    }
}

impl From<ConversionError> for InvocationError {
    fn from(err: ConversionError) -> Self {
        InvocationError::RuntimeFailure(err.to_string())
    }
}
