//! Built-in endpoints.
//!
//! Each endpoint exposes a fixed method table. Method names are the public,
//! case-sensitive wire names.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, LazyLock};

use dynacall_core::{BoundMethod, InvocationError, MethodTable, SharedTarget, Target};

/// Names accepted by [`by_name`], in default dispatch order.
pub const BUILTIN_ENDPOINTS: &[&str] = &["calculator", "text", "counter"];

/// Look up a built-in endpoint by its configuration name.
#[must_use]
pub fn by_name(name: &str) -> Option<SharedTarget> {
    match name {
        "calculator" => Some(Arc::new(Calculator)),
        "text" => Some(Arc::new(Text)),
        "counter" => Some(Arc::new(Counter::default())),
        _ => None,
    }
}

// ============================================================================
// Calculator
// ============================================================================

/// Floating-point arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

#[allow(clippy::unused_self)]
impl Calculator {
    fn add(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    fn sub(&self, a: f64, b: f64) -> f64 {
        a - b
    }

    fn mul(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    fn div(&self, a: f64, b: f64) -> Result<f64, InvocationError> {
        if b == 0.0 {
            return Err(InvocationError::runtime("division by zero"));
        }
        Ok(a / b)
    }

    fn sqrt(&self, x: f64) -> f64 {
        assert!(x >= 0.0, "square root of negative number {x}");
        x.sqrt()
    }

    fn div_mod(&self, a: i64, b: i64) -> Result<(i64, i64), InvocationError> {
        match (a.checked_div_euclid(b), a.checked_rem_euclid(b)) {
            (Some(quotient), Some(remainder)) => Ok((quotient, remainder)),
            _ => Err(InvocationError::runtime("division by zero")),
        }
    }
}

impl Target for Calculator {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        static METHODS: LazyLock<MethodTable<Calculator>> = LazyLock::new(|| {
            MethodTable::new()
                .with("Add", Calculator::add)
                .with("Sub", Calculator::sub)
                .with("Mul", Calculator::mul)
                .with("Div", Calculator::div)
                .with("Sqrt", Calculator::sqrt)
                .with("DivMod", Calculator::div_mod)
        });
        METHODS.bind(self, name)
    }
}

// ============================================================================
// Text
// ============================================================================

/// String helpers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

#[allow(clippy::unused_self)]
impl Text {
    fn concat(&self, a: String, b: String) -> String {
        a + &b
    }

    fn upper(&self, s: String) -> String {
        s.to_uppercase()
    }

    fn split(&self, s: String, separator: String) -> Result<Vec<String>, InvocationError> {
        if separator.is_empty() {
            return Err(InvocationError::runtime("empty separator"));
        }
        Ok(s.split(separator.as_str()).map(ToString::to_string).collect())
    }

    fn len(&self, s: String) -> usize {
        s.chars().count()
    }
}

impl Target for Text {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        static METHODS: LazyLock<MethodTable<Text>> = LazyLock::new(|| {
            MethodTable::new()
                .with("Concat", Text::concat)
                .with("Upper", Text::upper)
                .with("Split", Text::split)
                .with("Len", Text::len)
        });
        METHODS.bind(self, name)
    }
}

// ============================================================================
// Counter
// ============================================================================

/// Shared counter; safe to call from many threads at once.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicI64,
}

impl Counter {
    fn increment(&self) -> i64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn get(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.value.store(0, Ordering::SeqCst);
    }
}

impl Target for Counter {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        static METHODS: LazyLock<MethodTable<Counter>> = LazyLock::new(|| {
            MethodTable::new()
                .with("Increment", Counter::increment)
                .with("Get", Counter::get)
                .with("Reset", Counter::reset)
        });
        METHODS.bind(self, name)
    }
}
