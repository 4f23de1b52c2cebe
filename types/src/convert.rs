//! Conversions between [`Value`] and native Rust types.
//!
//! [`FromValue`] receives arguments, [`IntoValue`] produces single values and
//! [`IntoResults`] turns a method's native return into an ordered result list.

use std::collections::BTreeMap;

use crate::{CallResult, ConversionError, InvocationError, Value};

/// Convert from [`Value`] into a native type.
///
/// Implement this trait to allow a type to be received as a method argument.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

/// Convert a native type into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Convert a method's native return into an ordered result list.
///
/// `()` produces no results, a single value produces one, tuples produce one
/// per element. `Result` surfaces its error as the call's error.
pub trait IntoResults {
    fn into_results(self) -> CallResult;
}

// ============================================================================
// FromValue
// ============================================================================

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ConversionError::mismatch("bool", other.kind())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(ConversionError::mismatch("i64", other.kind())),
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {$(
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ConversionError> {
                match value {
                    Value::Int(i) => <$ty>::try_from(i).map_err(|_| ConversionError::OutOfRange {
                        value: i.to_string(),
                        target: stringify!($ty),
                    }),
                    other => Err(ConversionError::mismatch(stringify!($ty), other.kind())),
                }
            }
        }
    )*};
}

narrow_int!(i32, u32, u64, usize);

// Integers are numbers too; this is the only cross-kind conversion.
impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(ConversionError::mismatch("f64", other.kind())),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(f) => Ok(f as f32),
            Value::Int(i) => Ok(i as f32),
            other => Err(ConversionError::mismatch("f32", other.kind())),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(ConversionError::mismatch("String", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ConversionError::mismatch("Vec", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Map(map) => map
                .into_iter()
                .map(|(key, item)| T::from_value(item).map(|item| (key, item)))
                .collect(),
            other => Err(ConversionError::mismatch("BTreeMap", other.kind())),
        }
    }
}

// ============================================================================
// IntoValue
// ============================================================================

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for u32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

macro_rules! wide_unsigned {
    ($($ty:ty),*) => {$(
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                match i64::try_from(self) {
                    Ok(i) => Value::Int(i),
                    Err(_) => Value::Float(self as f64),
                }
            }
        }
    )*};
}

wide_unsigned!(u64, usize);

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Str(self.to_string())
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: IntoValue> IntoValue for BTreeMap<String, T> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(key, item)| (key, item.into_value()))
                .collect(),
        )
    }
}

macro_rules! value_from {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                value.into_value()
            }
        }
    )*};
}

value_from!(bool, i64, i32, u32, u64, usize, f64, f32, String, &str);

impl<T: IntoValue> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        value.into_value()
    }
}

impl<T: IntoValue> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.into_value()
    }
}

// ============================================================================
// IntoResults
// ============================================================================

impl IntoResults for () {
    fn into_results(self) -> CallResult {
        Ok(Vec::new())
    }
}

impl<T: IntoValue> IntoResults for T {
    fn into_results(self) -> CallResult {
        Ok(vec![self.into_value()])
    }
}

macro_rules! tuple_results {
    ($($name:ident),+) => {
        impl<$($name: IntoValue),+> IntoResults for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_results(self) -> CallResult {
                let ($($name,)+) = self;
                Ok(vec![$($name.into_value()),+])
            }
        }
    };
}

tuple_results!(A, B);
tuple_results!(A, B, C);
tuple_results!(A, B, C, D);

impl<R, E> IntoResults for Result<R, E>
where
    R: IntoResults,
    E: Into<InvocationError>,
{
    fn into_results(self) -> CallResult {
        match self {
            Ok(value) => value.into_results(),
            Err(error) => Err(error.into()),
        }
    }
}
