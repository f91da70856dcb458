//! Request logging infrastructure
//!
//! Short trace ids correlate the entry line, the cluster binding and the
//! exit line of a single request.

mod trace_context;

pub use trace_context::{generate_trace_id, RequestSpan, TraceContext};
