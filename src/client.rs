//! Typed client for the gateway.
//!
//! Every call is built from a [`Route`], so the method and path always come
//! from the same table the router is checked against. One request per call,
//! no retry, no caching, no timeout beyond what `reqwest` defaults to.

use anyhow::{Context, Result};
use reqwest::{Client, Response, header::COOKIE, redirect::Policy};
use serde::Serialize;
use std::env::var;
use tracing::debug;
use url::Url;

use crate::{
    APP_USER_AGENT,
    api::{
        routes::{AuthEndpoint, Route},
        types::{SignInEmail, SignInSocial, SignUpEmail},
    },
};

pub const API_URL_ENV: &str = "VESTLY_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .redirect(Policy::none())
            .build()
            .context("Failed to build API client")?;

        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL from `VESTLY_API_URL`, falling back to `http://localhost:3000`.
    ///
    /// # Errors
    /// Returns an error if the variable is set to something that is not a URL.
    pub fn from_env() -> Result<Self> {
        let raw = var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let url = Url::parse(&raw).with_context(|| format!("Invalid {API_URL_ENV}: {raw}"))?;
        Self::new(&url)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a route.
    ///
    /// # Errors
    /// Returns an error if the joined URL does not parse.
    pub fn url(&self, route: Route) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, route.path());
        Url::parse(&raw).with_context(|| format!("Invalid API URL: {raw}"))
    }

    /// Issue `route` once, with an optional JSON body and `Cookie` header.
    ///
    /// # Errors
    /// Returns an error only when the gateway could not be reached.
    pub async fn send<T: Serialize + ?Sized>(
        &self,
        route: Route,
        body: Option<&T>,
        cookie: Option<&str>,
    ) -> Result<Response> {
        let url = self.url(route)?;
        debug!("{} {url}", route.method());

        let mut request = self.client.request(route.method(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        request
            .send()
            .await
            .with_context(|| format!("{} {} failed", route.method(), route.path()))
    }

    async fn call(&self, route: Route, cookie: Option<&str>) -> Result<Response> {
        self.send::<()>(route, None, cookie).await
    }

    /// # Errors
    /// Returns an error if the gateway is unreachable.
    pub async fn hello(&self) -> Result<Response> {
        self.call(Route::Hello, None).await
    }

    /// # Errors
    /// Returns an error if the gateway is unreachable.
    pub async fn booklets(&self) -> Result<Response> {
        self.call(Route::Booklets, None).await
    }

    /// # Errors
    /// Returns an error if the gateway is unreachable.
    pub async fn get_session(&self, cookie: &str) -> Result<Response> {
        self.call(Route::Auth(AuthEndpoint::GetSession), Some(cookie))
            .await
    }

    /// # Errors
    /// Returns an error if the gateway is unreachable.
    pub async fn sign_up_email(&self, payload: &SignUpEmail) -> Result<Response> {
        self.send(Route::Auth(AuthEndpoint::SignUpEmail), Some(payload), None)
            .await
    }

    /// # Errors
    /// Returns an error if the gateway is unreachable.
    pub async fn sign_in_email(&self, payload: &SignInEmail) -> Result<Response> {
        self.send(Route::Auth(AuthEndpoint::SignInEmail), Some(payload), None)
            .await
    }

    /// The delegate answers with the provider URL to send the browser to.
    ///
    /// # Errors
    /// Returns an error if the gateway is unreachable.
    pub async fn sign_in_social(&self, payload: &SignInSocial) -> Result<Response> {
        self.send(Route::Auth(AuthEndpoint::SignInSocial), Some(payload), None)
            .await
    }

    /// # Errors
    /// Returns an error if the gateway is unreachable.
    pub async fn sign_out(&self, cookie: &str) -> Result<Response> {
        self.call(Route::Auth(AuthEndpoint::SignOut), Some(cookie))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_defaults_to_localhost() {
        temp_env::with_var(API_URL_ENV, None::<&str>, || {
            let client = ApiClient::from_env().unwrap();
            assert_eq!(client.base_url(), "http://localhost:3000");
        });
    }

    #[test]
    fn from_env_reads_override() {
        temp_env::with_var(API_URL_ENV, Some("https://api.vestly.app/"), || {
            let client = ApiClient::from_env().unwrap();
            assert_eq!(client.base_url(), "https://api.vestly.app");
        });
    }

    #[test]
    fn from_env_rejects_garbage() {
        temp_env::with_var(API_URL_ENV, Some("not a url"), || {
            assert!(ApiClient::from_env().is_err());
        });
    }

    #[test]
    fn url_joins_route_path() {
        let client = ApiClient::new(&Url::parse("http://gateway:3000/").unwrap()).unwrap();
        assert_eq!(
            client.url(Route::Booklets).unwrap().as_str(),
            "http://gateway:3000/booklets"
        );
        assert_eq!(
            client
                .url(Route::Auth(AuthEndpoint::SignInSocial))
                .unwrap()
                .as_str(),
            "http://gateway:3000/api/auth/sign-in/social"
        );
    }

    #[tokio::test]
    async fn unreachable_gateway_is_an_error() {
        let client = ApiClient::new(&Url::parse("http://127.0.0.1:1").unwrap()).unwrap();
        assert!(client.hello().await.is_err());
    }
}
