//! # Vestly (API gateway)
//!
//! `vestly` is the HTTP front door of the Vestly personal-finance app. It owns
//! no credentials and no tables of its own; it routes traffic between the
//! browser, the auth delegate, and the database.
//!
//! ## Routes
//!
//! - `/api/auth/*` is forwarded verbatim to the auth delegate. Status, headers
//!   (every `Set-Cookie`) and body come back untouched.
//! - `/hello` is a fixed liveness payload.
//! - `/booklets` lists every booklet row.
//!
//! All of them sit behind a CORS layer that reflects the caller's `Origin` and
//! allows credentialed requests, so a front end on another origin can still
//! exchange session cookies.
//!
//! > **Warning:** `/booklets` is not scoped to the caller and performs no
//! > authorization check. Anyone who can reach the gateway can read every
//! > booklet name and owner id.
//!
//! ## Route Guard
//!
//! Page requests under the protected prefix (`/dashboard` by default) are
//! checked against the auth delegate's session endpoint before they are
//! served. No session means a `307` to `/login`.
//!
//! ## Typed Client
//!
//! [`client::ApiClient`] builds requests from [`api::routes::Route`], the same
//! table the router is checked against, so callers cannot address a route the
//! gateway does not serve.

pub mod api;
pub mod cli;
pub mod client;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
