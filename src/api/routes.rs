//! Request-schema table for the gateway.
//!
//! [`ROUTES`] lists every method + path the gateway serves. [`Route`] is the
//! typed form the client builds requests from; every variant resolves to an
//! entry of the table, and the router is tested against the same table.

use axum::http::Method;

/// Prefix owned by the auth delegate. Everything below it is forwarded.
pub const AUTH_PREFIX: &str = "/api/auth";

/// Axum path pattern for the forwarded auth routes.
pub const AUTH_PATTERN: &str = "/api/auth/*rest";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Methods {
    Get,
    Any,
}

impl Methods {
    #[must_use]
    pub fn allows(self, method: &Method) -> bool {
        match self {
            Self::Get => *method == Method::GET,
            Self::Any => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteSpec {
    /// Path as registered on the router.
    pub pattern: &'static str,
    pub methods: Methods,
    /// Whether the route appears in the generated `OpenAPI` document.
    pub documented: bool,
}

impl RouteSpec {
    #[must_use]
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if !self.methods.allows(method) {
            return false;
        }
        match self.pattern.strip_suffix("/*rest") {
            Some(prefix) => path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.len() > 1 && rest.starts_with('/')),
            None => self.pattern == path,
        }
    }
}

pub const ROUTES: &[RouteSpec] = &[
    RouteSpec {
        pattern: "/hello",
        methods: Methods::Get,
        documented: true,
    },
    RouteSpec {
        pattern: "/booklets",
        methods: Methods::Get,
        documented: true,
    },
    RouteSpec {
        pattern: AUTH_PATTERN,
        methods: Methods::Any,
        documented: false,
    },
];

/// Find the table entry serving `method` + `path`, if any.
#[must_use]
pub fn lookup(method: &Method, path: &str) -> Option<&'static RouteSpec> {
    ROUTES.iter().find(|spec| spec.matches(method, path))
}

/// Auth delegate endpoints the front end calls through the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEndpoint {
    GetSession,
    SignUpEmail,
    SignInEmail,
    SignInSocial,
    SignOut,
}

impl AuthEndpoint {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::GetSession => "/api/auth/get-session",
            Self::SignUpEmail => "/api/auth/sign-up/email",
            Self::SignInEmail => "/api/auth/sign-in/email",
            Self::SignInSocial => "/api/auth/sign-in/social",
            Self::SignOut => "/api/auth/sign-out",
        }
    }

    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::GetSession => Method::GET,
            Self::SignUpEmail | Self::SignInEmail | Self::SignInSocial | Self::SignOut => {
                Method::POST
            }
        }
    }
}

/// A request the gateway is known to accept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Hello,
    Booklets,
    Auth(AuthEndpoint),
}

impl Route {
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Hello | Self::Booklets => Method::GET,
            Self::Auth(endpoint) => endpoint.method(),
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Hello => "/hello",
            Self::Booklets => "/booklets",
            Self::Auth(endpoint) => endpoint.path(),
        }
    }

    /// The table entry serving this route.
    #[must_use]
    pub fn spec(self) -> Option<&'static RouteSpec> {
        lookup(&self.method(), self.path())
    }
}
