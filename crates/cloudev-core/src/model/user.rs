// ── User and credential types ──

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// The only user details schema version this crate understands.
pub const SUPPORTED_USER_DETAILS_VERSION: &str = "1";

/// The principal a session acts as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub user_id: String,
    pub user_name: String,
    pub display_name: String,
    pub primary_email: Option<String>,
    pub version: String,
}

/// Short form of [`UserDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

impl From<&UserDetails> for Identity {
    fn from(details: &UserDetails) -> Self {
        Self {
            id: details.user_id.clone(),
            name: details.user_name.clone(),
        }
    }
}

/// Who a new set of credentials belongs to, when the caller already knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    /// Only the id; details are resolved on the next verification.
    Id(String),
    Details(UserDetails),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Details(d) => &d.user_id,
        }
    }
}

impl From<&str> for UserRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl From<String> for UserRef {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<UserDetails> for UserRef {
    fn from(details: UserDetails) -> Self {
        Self::Details(details)
    }
}

/// A freshly minted personal access token. The secret is only ever shown once.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub id: Option<String>,
    pub name: String,
    pub secret: SecretString,
    pub expires_time: Option<DateTime<Utc>>,
}
