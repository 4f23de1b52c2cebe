//! Typed handler adapters.
//!
//! A handler is any `Fn(&T, A1, .., An) -> R` whose parameters implement
//! [`FromValue`] and whose return implements [`IntoResults`]. The adapter is
//! the call mechanism: it checks arity, converts each argument in order and
//! converts the native return back into a result list.

use std::cmp::Ordering;
use std::vec;

use dynacall_types::{CallResult, FromValue, IntoResults, InvocationError, Value};

/// A callable registered under a method name.
///
/// `Marker` only disambiguates the blanket impls for different arities; it is
/// inferred at registration and never named by callers.
pub trait Handler<T: ?Sized, Marker>: Send + Sync + 'static {
    fn invoke(&self, target: &T, args: Vec<Value>) -> CallResult;
}

/// Positional argument cursor with arity already checked. Positions in error
/// messages count from 1.
pub(crate) struct Arguments {
    values: vec::IntoIter<Value>,
    position: usize,
}

impl Arguments {
    pub(crate) fn with_arity(args: Vec<Value>, arity: usize) -> Result<Self, InvocationError> {
        let got = args.len();
        match got.cmp(&arity) {
            Ordering::Greater => Err(InvocationError::runtime(format!(
                "call with too many input arguments (expected {arity}, got {got})"
            ))),
            Ordering::Less => Err(InvocationError::runtime(format!(
                "call with too few input arguments (expected {arity}, got {got})"
            ))),
            Ordering::Equal => Ok(Self {
                values: args.into_iter(),
                position: 1,
            }),
        }
    }

    pub(crate) fn next<A: FromValue>(&mut self) -> Result<A, InvocationError> {
        let position = self.position;
        self.position += 1;
        let value = self
            .values
            .next()
            .ok_or_else(|| InvocationError::runtime("call with too few input arguments"))?;
        A::from_value(value)
            .map_err(|err| InvocationError::runtime(format!("{err} (argument {position})")))
    }
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<T, F, R, $($arg,)*> Handler<T, fn($($arg,)*) -> R> for F
        where
            T: ?Sized,
            F: Fn(&T, $($arg),*) -> R + Send + Sync + 'static,
            R: IntoResults,
            $($arg: FromValue,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn invoke(&self, target: &T, args: Vec<Value>) -> CallResult {
                let arity: usize = 0 $(+ { let _ = stringify!($arg); 1 })*;
                let mut arguments = Arguments::with_arity(args, arity)?;
                $(let $arg = arguments.next::<$arg>()?;)*
                (self)(target, $($arg),*).into_results()
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
impl_handler!(A1, A2, A3, A4, A5);
impl_handler!(A1, A2, A3, A4, A5, A6);
