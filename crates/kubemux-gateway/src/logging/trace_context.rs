//! Per-request trace context

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::{info, info_span, Span};

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Six hex characters, unique enough to grep a log file by.
pub fn generate_trace_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let micros = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0);
    format!("{:06x}", counter.wrapping_add(micros) & 0xFF_FFFF)
}

/// Correlation data for one request.
#[derive(Debug, Clone)]
pub struct TraceContext {
    pub trace_id: String,
    pub method: String,
    pub path: String,
    /// Target the request was bound to (`default`, `cluster:7`)
    pub target: Option<String>,
    pub started_at: Instant,
}

impl TraceContext {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            trace_id: generate_trace_id(),
            method: method.to_string(),
            path: path.to_string(),
            target: None,
            started_at: Instant::now(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

/// Span and entry/exit lines for a request.
pub struct RequestSpan;

impl RequestSpan {
    pub fn enter(ctx: &TraceContext) -> Span {
        info_span!(
            "request",
            trace_id = %ctx.trace_id,
            method = %ctx.method,
            path = %ctx.path,
        )
    }

    pub fn log_entry(ctx: &TraceContext) {
        info!(trace_id = %ctx.trace_id, "→ {} {}", ctx.method, ctx.path);
    }

    pub fn log_exit(ctx: &TraceContext, status: u16) {
        match &ctx.target {
            Some(target) => info!(
                trace_id = %ctx.trace_id,
                "← {} [{}] ({}ms)",
                status,
                target,
                ctx.elapsed_ms()
            ),
            None => info!(trace_id = %ctx.trace_id, "← {} ({}ms)", status, ctx.elapsed_ms()),
        }
    }
}
