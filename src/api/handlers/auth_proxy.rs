//! Pass-through for `/api/auth/*`.
//!
//! Whatever the auth delegate answers (status, every header but connection
//! management, body) goes back to the caller unmodified. Only an unreachable
//! delegate is answered locally.

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{ConnectInfo, Extension},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{debug, error};

use crate::api::{
    delegate::{AuthDelegate, forwardable_response_headers},
    types::ErrorBody,
};

/// Largest request body forwarded to the auth delegate.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

// axum handler for /api/auth/*
pub async fn forward(
    delegate: Extension<Arc<AuthDelegate>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path_and_query = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());

    let client = peer.map(|ConnectInfo(addr)| addr.ip());

    let upstream = match delegate
        .forward(method, path_and_query, &headers, client, body)
        .await
    {
        Ok(upstream) => upstream,
        Err(err) => {
            error!("Failed to forward {path_and_query}: {err:#}");
            return unavailable();
        }
    };

    let status = upstream.status();
    let upstream_headers = forwardable_response_headers(upstream.headers());
    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("Failed to read auth delegate response for {path_and_query}: {err}");
            return unavailable();
        }
    };

    debug!(status = status.as_u16(), "auth delegate answered {path_and_query}");

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = upstream_headers;
    response
}

fn unavailable() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorBody::new("auth delegate unavailable")),
    )
        .into_response()
}
