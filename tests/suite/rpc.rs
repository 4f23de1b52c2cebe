//! RPC dispatch tests

use std::sync::Arc;

use dynacall_core::{InvocationError, Value};
use dynacall_engine::builtins::{Counter, Text};
use dynacall_engine::{Request, Response, ServerError};

use crate::common::{Arith, Faulty, arith_server, request_json, server_with};

#[test]
fn rpc_table() {
    struct Case {
        method: &'static str,
        args: Vec<Value>,
        expected: Result<&'static str, &'static str>,
    }

    let cases = [
        Case {
            method: "Add",
            args: vec![Value::Int(1), Value::Int(2)],
            expected: Ok("[3]"),
        },
        Case {
            method: "Sub",
            args: vec![Value::Int(2), Value::Int(1)],
            expected: Ok("[1]"),
        },
        Case {
            method: "Add",
            args: vec![Value::Int(1), Value::Int(2), Value::Int(3)],
            expected: Err("too many input arguments"),
        },
        Case {
            method: "Add",
            args: vec![Value::Int(1)],
            expected: Err("too few input arguments"),
        },
        Case {
            method: "NotImplemented",
            args: vec![],
            expected: Err("No such method"),
        },
    ];

    let server = arith_server();
    for case in cases {
        let outcome = server.handle(&request_json(case.method, case.args));
        match (outcome, case.expected) {
            (Ok(body), Ok(expected)) => assert_eq!(body, expected, "{}", case.method),
            (Err(err), Err(fragment)) => {
                assert!(err.to_string().contains(fragment), "{}: {err}", case.method);
            }
            (outcome, expected) => panic!("{}: got {outcome:?}, want {expected:?}", case.method),
        }
    }
}

#[test]
fn capitalized_envelope_is_accepted() {
    let body = arith_server()
        .handle(r#"{"MethodName":"Add","Args":[1,2]}"#)
        .unwrap();
    assert_eq!(body, "[3]");
}

#[test]
fn first_endpoint_that_knows_the_method_wins() {
    let server = server_with(vec![Arc::new(Text), Arc::new(Arith), Arc::new(Faulty)]);
    assert_eq!(
        server.dispatch(&Request::new("Sub", vec![Value::Int(5), Value::Int(3)])),
        Ok(vec![Value::Float(2.0)])
    );
    assert_eq!(
        server.dispatch(&Request::new("Fail", vec![Value::Str("nope".into())])),
        Err(InvocationError::runtime("nope"))
    );
    assert_eq!(
        server.dispatch(&Request::new("Missing", vec![])),
        Err(InvocationError::NoSuchMethod)
    );
}

#[test]
fn panics_in_endpoints_stop_dispatch() {
    let counter = Arc::new(Counter::default());
    let server = server_with(vec![Arc::new(Faulty), counter.clone()]);
    let err = server.handle(&request_json("PanicStr", vec![])).unwrap_err();
    assert!(matches!(
        err,
        ServerError::Invocation(InvocationError::RuntimeFailure(ref message)) if message == "static message"
    ));
    assert_eq!(
        server.dispatch(&Request::new("Get", vec![])),
        Ok(vec![Value::Int(0)])
    );
}

#[test]
fn respond_encodes_every_outcome() {
    let server = arith_server();

    let ok: Response = serde_json::from_str(&server.respond(&request_json(
        "Add",
        vec![Value::Float(0.5), Value::Float(0.25)],
    )))
    .unwrap();
    assert_eq!(ok, Response::Result(vec![Value::Float(0.75)]));

    let missing: Response =
        serde_json::from_str(&server.respond(&request_json("Mul", vec![]))).unwrap();
    assert!(missing.is_error());

    let malformed = server.respond("{\"method\": 3}");
    assert!(malformed.contains("bad_request"), "{malformed}");
}
