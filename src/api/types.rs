//! Request/response types shared by the gateway handlers and the typed client.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const HELLO_MESSAGE: &str = "Hello from Vestly API!";

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Hello {
    pub message: String,
}

impl Hello {
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: HELLO_MESSAGE.to_string(),
        }
    }
}

impl Default for Hello {
    fn default() -> Self {
        Self::new()
    }
}

/// A named ledger owned by exactly one user.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Booklet {
    pub id: Uuid,
    pub name: String,
    pub owner_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new("internal server error")
    }
}

/// Session payload returned by the auth delegate's `get-session` endpoint.
///
/// The delegate answers `null` when there is no session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session: SessionDetails,
    pub user: SessionUser,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Social identity providers the auth delegate is configured for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Google,
    Github,
}

impl SocialProvider {
    pub const ALL: [Self; 2] = [Self::Google, Self::Github];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "GitHub",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignUpEmail {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignInEmail {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignInSocial {
    pub provider: SocialProvider,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn booklet_serializes_camel_case() -> Result<(), Box<dyn std::error::Error>> {
        let booklet = Booklet {
            id: Uuid::nil(),
            name: "Groceries".to_string(),
            owner_id: "user_1".to_string(),
            created_at: NaiveDateTime::parse_from_str("2025-01-02 03:04:05", "%Y-%m-%d %H:%M:%S")?,
        };
        let value = serde_json::to_value(&booklet)?;
        assert_eq!(
            value,
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "name": "Groceries",
                "ownerId": "user_1",
                "createdAt": "2025-01-02T03:04:05"
            })
        );
        Ok(())
    }

    #[test]
    fn null_session_is_none() -> Result<(), serde_json::Error> {
        let session: Option<Session> = serde_json::from_str("null")?;
        assert!(session.is_none());
        Ok(())
    }

    #[test]
    fn session_parses_delegate_payload() -> Result<(), serde_json::Error> {
        let session: Option<Session> = serde_json::from_value(json!({
            "session": {
                "id": "sess_1",
                "userId": "user_1",
                "expiresAt": "2030-01-01T00:00:00.000Z",
                "token": "ignored"
            },
            "user": {
                "id": "user_1",
                "email": "jane@example.com",
                "name": "Jane",
                "emailVerified": false
            }
        }))?;
        let session = session.map(|s| s.user.name);
        assert_eq!(session.as_deref(), Some("Jane"));
        Ok(())
    }

    #[test]
    fn sign_in_social_uses_callback_url_key() -> Result<(), serde_json::Error> {
        let body = SignInSocial {
            provider: SocialProvider::Github,
            callback_url: "/dashboard".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&body)?,
            json!({"provider": "github", "callbackURL": "/dashboard"})
        );
        Ok(())
    }
}
