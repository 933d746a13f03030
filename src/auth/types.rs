//! Identity data model and the wire shapes of the backend `{message, data}`
//! envelope.

use crate::auth::cookies::SessionCookies;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Role of an authenticated principal. Determines route-access eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// The authenticated principal's profile data.
///
/// `id` is backend-assigned and immutable; everything else mirrors the
/// backend's current-user payload. Unknown role strings fail deserialization,
/// which the exchange treats like any other failed hydration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub role: Role,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Every backend endpoint answers `{message, data}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Successful login/registration payload. The backend may embed the user or
/// return the token alone.
#[derive(Debug, Deserialize)]
pub struct TokenGrant {
    pub token: String,
    #[serde(default)]
    pub user: Option<Identity>,
}

/// Error payload shape: a message plus optional per-field validation errors.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Fields submitted to create an account.
#[derive(Debug)]
pub struct RegisterFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub phone_number: String,
}

/// Flat result of every exchange call. Callers branch on `success` only;
/// `message` is user-safe, `detail` is diagnostic and never rendered.
#[derive(Debug)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    pub detail: Option<String>,
    pub identity: Option<Identity>,
    pub cookies: Option<SessionCookies>,
}

impl Outcome {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            detail: None,
            identity: None,
            cookies: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            detail: None,
            identity: None,
            cookies: None,
        }
    }

    #[must_use]
    pub fn with_identity(mut self, identity: Option<Identity>) -> Self {
        self.identity = identity;
        self
    }

    #[must_use]
    pub fn with_cookies(mut self, cookies: SessionCookies) -> Self {
        self.cookies = Some(cookies);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
