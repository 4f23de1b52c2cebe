//! Core value types for dynacall.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies:
//! the tagged [`Value`] carried through argument and result lists, the
//! [`InvocationError`] taxonomy, and the conversion traits between values and
//! native Rust types.

mod convert;
mod error;
mod value;

pub use convert::{FromValue, IntoResults, IntoValue};
pub use error::{CallResult, ConversionError, InvocationError};
pub use value::{Value, ValueKind};
