//! Integration test modules

mod invoke;
mod rpc;
mod serve;
