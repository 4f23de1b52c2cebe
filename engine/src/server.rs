//! Sequential multi-endpoint dispatch.

use std::fmt;

use dynacall_core::{SharedTarget, call};
use dynacall_types::{CallResult, InvocationError};
use thiserror::Error;

use crate::request::{ErrorBody, ErrorKind, Request, Response};

/// Default cap on a single encoded request.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Per-request limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerLimits {
    pub max_request_bytes: usize,
}

impl Default for ServerLimits {
    fn default() -> Self {
        Self {
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

/// Error types for request handling.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Request too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },
    #[error("Bad request: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Failed to encode results: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

/// Dispatches requests to an ordered list of endpoints.
///
/// Each endpoint is tried in registration order. `NoSuchMethod` means "not
/// handled here" and moves on to the next endpoint; any other outcome is
/// final.
#[derive(Default)]
pub struct RpcServer {
    endpoints: Vec<SharedTarget>,
    limits: ServerLimits,
}

impl RpcServer {
    #[must_use]
    pub fn new(endpoints: Vec<SharedTarget>) -> Self {
        Self {
            endpoints,
            limits: ServerLimits::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: ServerLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: SharedTarget) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    #[must_use]
    pub fn limits(&self) -> ServerLimits {
        self.limits
    }

    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Invoke the request against each endpoint until one handles it.
    pub fn dispatch(&self, request: &Request) -> CallResult {
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            match call(endpoint, &request.method, request.args.clone()) {
                Err(InvocationError::NoSuchMethod) => {
                    tracing::debug!(method = %request.method, endpoint = index, "Not handled by endpoint");
                }
                outcome => return outcome,
            }
        }
        Err(InvocationError::NoSuchMethod)
    }

    /// Decode a JSON request, dispatch it, and encode the results as a JSON array.
    pub fn handle(&self, input: &str) -> Result<String, ServerError> {
        let request = self.decode(input)?;
        let results = self.dispatch(&request)?;
        serde_json::to_string(&results).map_err(ServerError::Encode)
    }

    /// Like [`handle`](Self::handle), but always produces a [`Response`] line.
    #[must_use]
    pub fn respond(&self, input: &str) -> String {
        encode_response(&self.reply(input))
    }

    pub(crate) fn reply(&self, input: &str) -> Response {
        match self.decode(input) {
            Ok(request) => Response::from(self.dispatch(&request)),
            Err(err) => Response::bad_request(err.to_string()),
        }
    }

    fn decode(&self, input: &str) -> Result<Request, ServerError> {
        let limit = self.limits.max_request_bytes;
        if input.len() > limit {
            return Err(ServerError::TooLarge {
                size: input.len(),
                limit,
            });
        }
        Request::from_json(input).map_err(ServerError::Decode)
    }
}

impl fmt::Debug for RpcServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcServer")
            .field("endpoints", &self.endpoints.len())
            .field("limits", &self.limits)
            .finish()
    }
}

pub(crate) fn encode_response(response: &Response) -> String {
    match serde_json::to_string(response) {
        Ok(line) => line,
        Err(err) => {
            tracing::warn!("Failed to encode response: {err}");
            let fallback = Response::Error(ErrorBody::new(
                ErrorKind::RuntimeFailure,
                format!("Failed to encode results: {err}"),
            ));
            serde_json::to_string(&fallback).unwrap_or_default()
        }
    }
}
