//! Cluster binder middleware
//!
//! Runs before every cluster-scoped handler:
//!
//! 1. read `cluster_id` from the query string, or from a url-encoded form
//!    body when the query has none (absent or empty means default)
//! 2. resolve it through the [`ConnectionManager`]
//! 3. store a [`ClusterServices`] in the request extensions
//!
//! Any failure ends the request with the mapped error and no handler runs.

use axum::{
    body::{self, Body},
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use kubemux_core::TargetId;
use tracing::{debug, warn};

use crate::logging::TraceContext;
use crate::pool::ConnectionManager;
use crate::services::ClusterServices;

use super::response::ApiError;

pub const CLUSTER_ID_PARAM: &str = "cluster_id";

/// Largest form body buffered while looking for `cluster_id`.
pub const FORM_BODY_LIMIT: usize = 1024 * 1024;

/// Target label the binder attaches to the response for the exit log line.
#[derive(Debug, Clone)]
pub struct BoundTarget(pub String);

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// Read `cluster_id` from a url-encoded form body. The body is buffered and
/// put back so handlers still see it.
async fn form_cluster_id(request: Request) -> Result<(Request, Option<String>), ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = body::to_bytes(body, FORM_BODY_LIMIT)
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?;
    let value = url::form_urlencoded::parse(&bytes)
        .find(|(key, _)| key == CLUSTER_ID_PARAM)
        .map(|(_, value)| value.into_owned());
    Ok((Request::from_parts(parts, Body::from(bytes)), value))
}

/// Value of the `cluster_id` query parameter, if present.
pub fn cluster_id_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == CLUSTER_ID_PARAM)
        .map(|(_, value)| value.into_owned())
}

pub async fn cluster_binder(
    State(manager): State<ConnectionManager>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut raw = cluster_id_param(request.uri().query());
    if raw.is_none() && is_form(&request) {
        match form_cluster_id(request).await {
            Ok((rebuilt, value)) => {
                request = rebuilt;
                raw = value;
            }
            Err(e) => return e.into_response(),
        }
    }
    let trace_id = request
        .extensions()
        .get::<TraceContext>()
        .map(|ctx| ctx.trace_id.clone())
        .unwrap_or_default();

    let target = match TargetId::from_query(raw.as_deref()) {
        Ok(target) => target,
        Err(e) => {
            debug!(trace_id = %trace_id, "[Binder] Rejected cluster_id: {}", e);
            return ApiError::from(e).into_response();
        }
    };

    let handle = match manager.resolve(target).await {
        Ok(handle) => handle,
        Err(e) => {
            warn!(
                trace_id = %trace_id,
                target = %target,
                kind = e.kind(),
                "[Binder] Could not bind cluster: {}",
                e
            );
            let mut response = ApiError::from(e).into_response();
            response
                .extensions_mut()
                .insert(BoundTarget(target.to_string()));
            return response;
        }
    };

    debug!(
        trace_id = %trace_id,
        target = %target,
        endpoint = %handle.endpoint(),
        "[Binder] Bound request"
    );
    request
        .extensions_mut()
        .insert(ClusterServices::new(target, handle));

    let mut response = next.run(request).await;
    response
        .extensions_mut()
        .insert(BoundTarget(target.to_string()));
    response
}

impl<S> FromRequestParts<S> for ClusterServices
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClusterServices>()
            .cloned()
            .ok_or_else(|| ApiError::internal("No cluster bound to this request"))
    }
}
