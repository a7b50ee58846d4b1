//! HTTP handle on the auth delegate.
//!
//! The delegate owns credentials, sessions and OAuth handshakes. The gateway
//! only forwards raw requests to it and asks it who a cookie belongs to.

use anyhow::{Context, Result, anyhow};
use axum::{
    body::Bytes,
    http::{HeaderMap, HeaderName, HeaderValue, Method, header},
};
use reqwest::{Client, redirect::Policy};
use std::net::IpAddr;
use tracing::{Instrument, debug, info_span};
use url::Url;

use super::{routes::AuthEndpoint, types::Session};
use crate::APP_USER_AGENT;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

#[derive(Debug, Clone)]
pub struct AuthDelegate {
    base_url: String,
    client: Client,
}

impl AuthDelegate {
    /// Build a handle for the delegate reachable at `base_url`.
    ///
    /// Redirects are never followed; OAuth flows depend on them reaching the
    /// browser untouched.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .redirect(Policy::none())
            .build()
            .context("Failed to build auth delegate HTTP client")?;

        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            client,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path_and_query: &str) -> Result<Url> {
        let raw = format!("{}{path_and_query}", self.base_url);
        Url::parse(&raw).with_context(|| format!("Invalid auth delegate URL: {raw}"))
    }

    /// Forward a request as-is and hand back whatever the delegate answered.
    ///
    /// `client` is the peer address of the caller, when known; it is appended
    /// to `X-Forwarded-For`.
    ///
    /// # Errors
    /// Returns an error only when the delegate could not be reached.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        client: Option<IpAddr>,
        body: Bytes,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint(path_and_query)?;
        let span = info_span!("auth.forward", http.method = %method, http.url = %url);

        self.client
            .request(method, url)
            .headers(forwardable_request_headers(headers, client))
            .body(body)
            .send()
            .instrument(span)
            .await
            .context("Failed to reach auth delegate")
    }

    /// Ask the delegate which session the given `Cookie` header belongs to.
    ///
    /// `Ok(None)` means the delegate answered "no session".
    ///
    /// # Errors
    /// Returns an error on network failure, non-success status or an
    /// unreadable body.
    pub async fn lookup_session(&self, cookie: &str) -> Result<Option<Session>> {
        let url = self.endpoint(AuthEndpoint::GetSession.path())?;
        let span = info_span!("auth.session", http.url = %url);

        let response = self
            .client
            .get(url)
            .header(header::COOKIE, cookie)
            .send()
            .instrument(span)
            .await
            .context("Failed to reach auth delegate")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("auth delegate answered {status} to session lookup"));
        }

        let session = response
            .json::<Option<Session>>()
            .await
            .context("Failed to decode session payload")?;

        debug!(found = session.is_some(), "session lookup finished");

        Ok(session)
    }
}

/// Headers that describe a single connection and must not be forwarded.
#[must_use]
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Request headers worth sending upstream: everything except connection
/// management, `Host` (the client sets its own) and `Content-Length` (recomputed
/// from the buffered body), plus the `X-Forwarded-*` set describing the
/// original request.
#[must_use]
pub fn forwardable_request_headers(headers: &HeaderMap, client: Option<IpAddr>) -> HeaderMap {
    let mut forwarded = filter_headers(headers, &[header::HOST, header::CONTENT_LENGTH]);

    let chain = headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .chain(client.map(|ip| ip.to_string()))
        .collect::<Vec<_>>()
        .join(", ");
    forwarded.remove(X_FORWARDED_FOR);
    if !chain.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&chain) {
            forwarded.insert(X_FORWARDED_FOR, value);
        }
    }

    // An upstream proxy already recorded the public host and scheme.
    if !forwarded.contains_key(X_FORWARDED_HOST) {
        if let Some(host) = headers.get(header::HOST) {
            forwarded.insert(X_FORWARDED_HOST, host.clone());
        }
    }
    if !forwarded.contains_key(X_FORWARDED_PROTO) {
        forwarded.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    }

    forwarded
}

/// Response headers handed back to the caller. `Set-Cookie` may repeat and
/// every value is kept.
#[must_use]
pub fn forwardable_response_headers(headers: &HeaderMap) -> HeaderMap {
    filter_headers(headers, &[header::CONTENT_LENGTH])
}

fn filter_headers(headers: &HeaderMap, extra: &[HeaderName]) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name) || extra.contains(name) {
            continue;
        }
        filtered.append(name.clone(), value.clone());
    }
    filtered
}
