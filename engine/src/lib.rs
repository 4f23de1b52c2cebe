//! Request handling for dynacall.
//!
//! Wraps the invoker from `dynacall-core` in a JSON envelope, dispatches each
//! request across an ordered list of endpoints, and serves newline-delimited
//! requests from any async reader.

pub mod builtins;
mod request;
mod serve;
mod server;

pub use request::{ErrorBody, ErrorKind, Request, Response};
pub use serve::{DEFAULT_MAX_IN_FLIGHT, ServeError, ServeStats, serve};
pub use server::{DEFAULT_MAX_REQUEST_BYTES, RpcServer, ServerError, ServerLimits};
