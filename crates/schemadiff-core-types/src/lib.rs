//! Core types shared by the schemadiff facilities
//!
//! - **Correlation types**: `RequestId`, `TraceId`, `RequestContext`, used to tie
//!   a diff invocation's log events and errors together
//! - **Schema constants**: canonical structured-logging field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
