//! Minimal page shells: landing, login, signup and the guarded dashboard.
//!
//! Forms talk to the auth delegate through `/api/auth/*` and show the
//! delegate's error message verbatim when it refuses.

use axum::{extract::Extension, response::Html};
use std::sync::Arc;

use crate::api::{
    routes::AuthEndpoint,
    types::{Session, SocialProvider},
};

/// What the pages need to know about the auth delegate's configuration.
#[derive(Clone, Debug)]
pub struct PageSettings {
    pub social_providers: Vec<SocialProvider>,
}

impl PageSettings {
    /// Offer the configured providers, or every provider when none is
    /// configured; the delegate then runs with placeholder credentials.
    #[must_use]
    pub fn for_providers(configured: Vec<SocialProvider>) -> Self {
        if configured.is_empty() {
            Self::default()
        } else {
            Self {
                social_providers: configured,
            }
        }
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            social_providers: SocialProvider::ALL.to_vec(),
        }
    }
}

const SCRIPT: &str = r#"<script>
async function submitJson(form, url) {
  const body = Object.fromEntries(new FormData(form));
  const res = await fetch(url, {
    method: "POST",
    credentials: "include",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body),
  });
  if (res.ok) { window.location.assign("/dashboard"); return; }
  const data = await res.json().catch(() => ({}));
  form.querySelector("[role=alert]").textContent = data.message || "Request failed";
}
async function social(provider) {
  const res = await fetch("/api/auth/sign-in/social", {
    method: "POST",
    credentials: "include",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ provider, callbackURL: "/dashboard" }),
  });
  const data = await res.json().catch(() => ({}));
  if (data.url) window.location.assign(data.url);
}
async function signOut() {
  await fetch("/api/auth/sign-out", { method: "POST", credentials: "include" });
  window.location.assign("/login");
}
</script>"#;

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{title} · Vestly</title></head>\n<body>\n{body}\n{SCRIPT}\n</body></html>"
    ))
}

fn social_buttons(providers: &[SocialProvider]) -> String {
    providers
        .iter()
        .map(|provider| {
            format!(
                "<button type=\"button\" onclick=\"social('{}')\">Continue with {}</button>",
                provider.as_str(),
                provider.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn landing() -> Html<String> {
    layout(
        "Welcome",
        "<h1>Vestly</h1>\n<p>Track every booklet and transaction in one place.</p>\n<a href=\"/signup\">Get started</a> <a href=\"/login\">Log in</a>",
    )
}

pub async fn login(settings: Extension<Arc<PageSettings>>) -> Html<String> {
    let body = format!(
        "<h1>Log in</h1>\n<form onsubmit=\"submitJson(this, '{action}'); return false\">\n<label>Email <input name=\"email\" type=\"email\" required></label>\n<label>Password <input name=\"password\" type=\"password\" required></label>\n<p role=\"alert\"></p>\n<button type=\"submit\">Log in</button>\n</form>\n{social}\n<a href=\"/signup\">Create an account</a>",
        action = AuthEndpoint::SignInEmail.path(),
        social = social_buttons(&settings.social_providers),
    );
    layout("Log in", &body)
}

pub async fn signup(settings: Extension<Arc<PageSettings>>) -> Html<String> {
    let body = format!(
        "<h1>Sign up</h1>\n<form onsubmit=\"submitJson(this, '{action}'); return false\">\n<label>Name <input name=\"name\" minlength=\"2\" required></label>\n<label>Email <input name=\"email\" type=\"email\" required></label>\n<label>Password <input name=\"password\" type=\"password\" minlength=\"8\" required></label>\n<p role=\"alert\"></p>\n<button type=\"submit\">Sign up</button>\n</form>\n{social}\n<a href=\"/login\">Already have an account?</a>",
        action = AuthEndpoint::SignUpEmail.path(),
        social = social_buttons(&settings.social_providers),
    );
    layout("Sign up", &body)
}

/// Only reachable through the route guard, which attaches the session.
pub async fn dashboard(session: Option<Extension<Session>>) -> Html<String> {
    let name = session
        .as_ref()
        .map_or("there", |Extension(session)| session.user.name.as_str());
    let body = format!(
        "<h1>Overview</h1>\n<p>Welcome back, {}.</p>\n<button type=\"button\" onclick=\"signOut()\">Logout</button>",
        escape_html(name)
    );
    layout("Dashboard", &body)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
