//! HTTP Request/Response Logging Middleware
//!
//! One entry line and one exit line per request, correlated by trace id.
//! Bodies are logged at DEBUG, with credential-bearing routes redacted.

use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use http_body_util::BodyExt;
use tracing::{debug, warn, Instrument};

use crate::logging::{RequestSpan, TraceContext};

use super::binder::BoundTarget;

/// Maximum body size to log (1MB)
const MAX_BODY_LOG_SIZE: usize = 1024 * 1024;

/// Response bodies larger than this are summarized by size only
const MAX_RESPONSE_LOG_SIZE: usize = 2048;

/// Request bodies on these paths carry kubeconfigs or tokens
const SENSITIVE_PATHS: &[&str] = &["/api/v1/clusters", "/api/v1/secrets"];

/// Responses on these paths are never interesting in the log
const SKIP_BODY_PATHS: &[&str] = &["/logs"];

pub fn is_sensitive_path(path: &str) -> bool {
    SENSITIVE_PATHS.iter().any(|p| path.starts_with(p))
}

fn should_skip_body(path: &str) -> bool {
    SKIP_BODY_PATHS.iter().any(|p| path.ends_with(p))
}

/// Compact single-line rendering of a body for DEBUG output.
pub fn format_body(bytes: &[u8], redact: bool) -> String {
    if redact {
        return "[REDACTED]".to_string();
    }
    if bytes.is_empty() {
        return "[empty]".to_string();
    }
    if bytes.len() > MAX_BODY_LOG_SIZE {
        return format!("[{} bytes]", bytes.len());
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
                return serde_json::to_string(&json).unwrap_or_else(|_| text.to_string());
            }
            match text.char_indices().nth(200) {
                Some((idx, _)) => format!("{}...", &text[..idx]),
                None => text.to_string(),
            }
        }
        Err(_) => format!("[binary: {} bytes]", bytes.len()),
    }
}

/// Summary of an `{code, message, data}` envelope: the message, and the
/// item count when `data` is a list.
fn format_envelope(bytes: &[u8]) -> Option<String> {
    let json: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    let code = json.get("code")?.as_i64()?;
    let message = json.get("message").and_then(|m| m.as_str()).unwrap_or("");
    match json.get("data").and_then(|d| d.as_array()) {
        Some(items) => Some(format!("{} {} ({} items)", code, message, items.len())),
        None => Some(format!("{} {}", code, message)),
    }
}

/// Logging middleware for requests and responses
pub async fn http_logging_middleware(request: Request, next: Next) -> Result<Response, StatusCode> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let is_sensitive = is_sensitive_path(&path);

    let mut ctx = TraceContext::new(&method, &path);
    let span = RequestSpan::enter(&ctx);

    async move {
        RequestSpan::log_entry(&ctx);

        let (mut parts, body) = request.into_parts();
        let body_bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(trace_id = %ctx.trace_id, "Failed to read request body: {}", e);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        if !body_bytes.is_empty() {
            debug!(
                trace_id = %ctx.trace_id,
                body = %format_body(&body_bytes, is_sensitive),
                "Request body"
            );
        }

        parts.extensions.insert(ctx.clone());
        let request = Request::from_parts(parts, Body::from(body_bytes));

        let response = next.run(request).await;

        let (parts, body) = response.into_parts();
        let status = parts.status;

        if let Some(BoundTarget(target)) = parts.extensions.get::<BoundTarget>() {
            ctx = ctx.with_target(target.clone());
        }

        let body_bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(trace_id = %ctx.trace_id, "Failed to read response body: {}", e);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        if !should_skip_body(&path) && !body_bytes.is_empty() {
            let summary = if body_bytes.len() <= MAX_RESPONSE_LOG_SIZE && !is_sensitive {
                format_body(&body_bytes, false)
            } else {
                format_envelope(&body_bytes)
                    .unwrap_or_else(|| format!("[{} bytes]", body_bytes.len()))
            };
            debug!(trace_id = %ctx.trace_id, body = %summary, "Response body");
        }

        RequestSpan::log_exit(&ctx, status.as_u16());

        Ok(Response::from_parts(parts, Body::from(body_bytes)))
    }
    .instrument(span)
    .await
}
