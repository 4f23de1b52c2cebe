//! JSON request and response envelopes.

use dynacall_types::{CallResult, InvocationError, Value};
use serde::{Deserialize, Serialize};

/// A request to invoke `method` with positional `args`.
///
/// Decoding also accepts the `MethodName`/`Args` spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(alias = "MethodName")]
    pub method: String,
    #[serde(default, alias = "Args")]
    pub args: Vec<Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

/// Category of a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoSuchMethod,
    RuntimeFailure,
    BadRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorBody {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Line-protocol reply: `{"result": [..]}` or `{"error": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Result(Vec<Value>),
    Error(ErrorBody),
}

impl Response {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Error(ErrorBody::new(ErrorKind::BadRequest, message))
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<InvocationError> for Response {
    fn from(err: InvocationError) -> Self {
        let kind = match err {
            InvocationError::NoSuchMethod => ErrorKind::NoSuchMethod,
            InvocationError::RuntimeFailure(_) => ErrorKind::RuntimeFailure,
        };
        Self::Error(ErrorBody::new(kind, err.to_string()))
    }
}

impl From<CallResult> for Response {
    fn from(result: CallResult) -> Self {
        match result {
            Ok(values) => Self::Result(values),
            Err(err) => err.into(),
        }
    }
}
