//! Session gate for protected pages.
//!
//! Flow Overview: for a request under the protected prefix, forward its
//! `Cookie` header to the auth delegate's session endpoint. A session lets the
//! request through untouched (the session rides along as an extension); anything
//! else, including a delegate failure, ends in a redirect to `/login`.
//!
//! Every protected request pays one delegate round trip. Nothing is cached.

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::delegate::AuthDelegate;

pub const LOGIN_PATH: &str = "/login";
pub const DEFAULT_PROTECTED_PREFIX: &str = "/dashboard";

/// Matches a prefix and everything below it (`/dashboard`, `/dashboard/...`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtectedPaths {
    prefix: String,
}

impl ProtectedPaths {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_end_matches('/');
        let prefix = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        Self { prefix }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        path.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

impl Default for ProtectedPaths {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_PREFIX)
    }
}

/// Per-request guard progress. `Redirected` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Unchecked,
    Authorized,
    Redirected,
}

impl GuardState {
    /// Apply the outcome of the one session lookup a request gets.
    #[must_use]
    pub const fn resolve(self, session_found: bool) -> Self {
        match self {
            Self::Unchecked if session_found => Self::Authorized,
            Self::Unchecked => Self::Redirected,
            settled => settled,
        }
    }
}

#[derive(Debug)]
pub struct RouteGuard {
    delegate: Arc<AuthDelegate>,
    protected: ProtectedPaths,
}

impl RouteGuard {
    #[must_use]
    pub fn new(delegate: Arc<AuthDelegate>, protected: ProtectedPaths) -> Self {
        Self {
            delegate,
            protected,
        }
    }

    #[must_use]
    pub fn protected(&self) -> &ProtectedPaths {
        &self.protected
    }
}

/// Axum middleware enforcing [`RouteGuard`] on protected paths.
pub async fn require_session(
    State(guard): State<Arc<RouteGuard>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !guard.protected.matches(&path) {
        return next.run(request).await;
    }

    let cookie = request
        .headers()
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    // Lookup failures are indistinguishable from "no session" for the caller.
    let session = match guard.delegate.lookup_session(&cookie).await {
        Ok(session) => session,
        Err(err) => {
            warn!("Session lookup failed for {path}: {err:#}");
            None
        }
    };

    match (GuardState::Unchecked.resolve(session.is_some()), session) {
        (GuardState::Authorized, Some(session)) => {
            debug!(user_id = %session.user.id, "session accepted for {path}");
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        _ => {
            debug!("no session for {path}, redirecting to {LOGIN_PATH}");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}
