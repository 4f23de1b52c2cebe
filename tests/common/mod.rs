//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, LazyLock};

use dynacall_core::{BoundMethod, InvocationError, MethodTable, SharedTarget, Target};
use dynacall_engine::{Request, RpcServer};

/// Two-method float endpoint used by the RPC tests.
#[derive(Debug, Default)]
pub struct Arith;

impl Arith {
    fn add(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    fn sub(&self, a: f64, b: f64) -> f64 {
        a - b
    }
}

impl Target for Arith {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        static METHODS: LazyLock<MethodTable<Arith>> = LazyLock::new(|| {
            MethodTable::new()
                .with("Add", Arith::add)
                .with("Sub", Arith::sub)
        });
        METHODS.bind(self, name)
    }
}

/// Endpoint whose methods fail in every way a callee can.
#[derive(Debug, Default)]
pub struct Faulty;

impl Faulty {
    fn panic_str(&self) {
        panic!("static message");
    }

    fn panic_string(&self, code: i64) {
        panic!("failed with code {code}");
    }

    fn panic_other(&self) {
        std::panic::panic_any(42_u8);
    }

    fn fail(&self, reason: String) -> Result<(), InvocationError> {
        Err(InvocationError::runtime(reason))
    }

    fn out_of_bounds(&self, index: usize) -> i64 {
        let items = [1_i64, 2, 3];
        items[index]
    }
}

impl Target for Faulty {
    fn resolve(&self, name: &str) -> Option<BoundMethod<'_>> {
        static METHODS: LazyLock<MethodTable<Faulty>> = LazyLock::new(|| {
            MethodTable::new()
                .with("PanicStr", Faulty::panic_str)
                .with("PanicString", Faulty::panic_string)
                .with("PanicOther", Faulty::panic_other)
                .with("Fail", Faulty::fail)
                .with("OutOfBounds", Faulty::out_of_bounds)
        });
        METHODS.bind(self, name)
    }
}

pub fn arith_server() -> RpcServer {
    RpcServer::new(vec![Arc::new(Arith)])
}

pub fn server_with(endpoints: Vec<SharedTarget>) -> RpcServer {
    RpcServer::new(endpoints)
}

pub fn request_json(method: &str, args: Vec<dynacall_core::Value>) -> String {
    Request::new(method, args).to_json().unwrap()
}
