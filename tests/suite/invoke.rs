//! Invocation contract tests

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::LazyLock;

use dynacall_core::{
    BoundMethod, InvocationError, MethodTable, SharedTarget, Target, Value, call, invoke,
};
use dynacall_engine::builtins::{Calculator, Counter};

use crate::common::{Arith, Faulty};

#[test]
fn add_and_sub_return_their_results() {
    assert_eq!(invoke!(&Arith, "Add", 1, 2), Ok(vec![Value::Float(3.0)]));
    assert_eq!(invoke!(&Arith, "Sub", 2, 1), Ok(vec![Value::Float(1.0)]));
}

#[test]
fn arity_mismatches_name_the_direction() {
    let err = invoke!(&Arith, "Add", 1, 2, 3).unwrap_err();
    assert!(!err.is_no_such_method());
    assert!(err.to_string().contains("too many input arguments"), "{err}");

    let err = invoke!(&Arith, "Add", 1).unwrap_err();
    assert!(err.to_string().contains("too few input arguments"), "{err}");
}

#[test]
fn unknown_names_are_no_such_method() {
    assert_eq!(
        invoke!(&Arith, "NotImplemented"),
        Err(InvocationError::NoSuchMethod)
    );
    // Resolution is case-sensitive.
    assert_eq!(invoke!(&Arith, "add", 1, 2), Err(InvocationError::NoSuchMethod));
    assert_eq!(invoke!(&Arith, ""), Err(InvocationError::NoSuchMethod));
}

#[test]
fn argument_type_mismatch_is_a_runtime_failure() {
    let err = invoke!(&Arith, "Add", "one", 2).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("call using string as type f64"), "{message}");
    assert!(message.ends_with("(argument 1)"), "{message}");

    let err = invoke!(&Arith, "Add", 1, true).unwrap_err();
    assert_eq!(
        err,
        InvocationError::runtime("call using bool as type f64 (argument 2)")
    );
}

#[test]
fn panics_become_runtime_failures() {
    assert_eq!(
        invoke!(&Faulty, "PanicStr"),
        Err(InvocationError::runtime("static message"))
    );
    assert_eq!(
        invoke!(&Faulty, "PanicString", 7),
        Err(InvocationError::runtime("failed with code 7"))
    );
    assert_eq!(
        invoke!(&Faulty, "PanicOther"),
        Err(InvocationError::runtime("Unknown error"))
    );
    let err = invoke!(&Faulty, "OutOfBounds", 5).unwrap_err();
    assert!(err.to_string().contains("index out of bounds"), "{err}");
}

#[test]
fn callee_errors_pass_through() {
    assert_eq!(
        invoke!(&Faulty, "Fail", "disk full"),
        Err(InvocationError::runtime("disk full"))
    );
}

#[test]
fn absent_and_primitive_targets_have_no_methods() {
    let absent: Option<Arith> = None;
    assert_eq!(invoke!(&absent, "Add", 1, 2), Err(InvocationError::NoSuchMethod));
    assert_eq!(invoke!(&1.5_f64, "Add", 1, 2), Err(InvocationError::NoSuchMethod));
    assert_eq!(
        invoke!(&vec![Value::Int(1)], "Len"),
        Err(InvocationError::NoSuchMethod)
    );
}

#[test]
fn shared_targets_dispatch_dynamically() {
    let targets: Vec<SharedTarget> = vec![
        std::sync::Arc::new(Arith),
        std::sync::Arc::new(Calculator),
    ];
    for target in &targets {
        assert_eq!(
            call(target, "Add", vec![Value::Float(0.5), Value::Int(1)]),
            Ok(vec![Value::Float(1.5)])
        );
    }
}

#[test]
fn concurrent_calls_on_independent_targets() {
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8_i64)
            .map(|i| {
                scope.spawn(move || {
                    let target = Arith;
                    (0..100_i64)
                        .map(|j| invoke!(&target, "Add", i, j))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let results = handle.join().unwrap();
            for (j, result) in results.into_iter().enumerate() {
                assert_eq!(result, Ok(vec![Value::Float((i + j) as f64)]));
            }
        }
    });
}

#[test]
fn concurrent_calls_on_a_shared_target() {
    let counter = Counter::default();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..250 {
                    call(&counter, "Increment", vec![]).unwrap();
                }
            });
        }
    });
    assert_eq!(call(&counter, "Get", vec![]), Ok(vec![Value::Int(1000)]));
}

#[test]
fn panics_on_other_threads_do_not_leak() {
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| invoke!(&Faulty, "PanicStr")))
            .collect();
        for handle in handles {
            // The thread itself must not have panicked.
            let result = handle.join().unwrap();
            assert_eq!(result, Err(InvocationError::runtime("static message")));
        }
    });
}

struct Ledger {
    balance: AtomicI64,
}

impl Ledger {
    fn deposit(&self, amount: i64) -> i64 {
        self.balance.fetch_add(amount, Ordering::SeqCst) + amount
    }

    fn balance(&self) -> i64 {
        self.balance.load(Ordering::SeqCst)
    }
}

impl Target for Ledger {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        static METHODS: LazyLock<MethodTable<Ledger>> = LazyLock::new(|| {
            MethodTable::new()
                .with("Deposit", Ledger::deposit)
                .with("Balance", Ledger::balance)
        });
        METHODS.bind(self, name)
    }
}

#[test]
fn failed_calls_leave_target_untouched() {
    let ledger = Ledger {
        balance: AtomicI64::new(10),
    };
    assert!(invoke!(&ledger, "Deposit", "five").is_err());
    assert!(invoke!(&ledger, "Deposit", 1, 2).is_err());
    assert!(invoke!(&ledger, "Withdraw", 5).is_err());
    assert_eq!(invoke!(&ledger, "Balance"), Ok(vec![Value::Int(10)]));
    assert_eq!(invoke!(&ledger, "Deposit", 5), Ok(vec![Value::Int(15)]));
}
