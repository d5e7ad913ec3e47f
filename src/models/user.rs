//! User model for storage and API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time_utils::now_rfc3339;

/// A registered user.
///
/// Serialized in camelCase so the persisted blob matches what the web
/// client reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique id (`user_<uuid>`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address, normalized (unique)
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Remaining credit balance
    #[serde(default)]
    pub credits: u32,
    /// When the user registered (ISO 8601)
    pub created_at: String,
}

impl User {
    /// Build a new user record with a fresh id.
    pub fn new(name: &str, email: &str, password_hash: String, credits: u32) -> Self {
        Self {
            id: format!("user_{}", Uuid::now_v7().simple()),
            name: name.to_string(),
            email: normalize_email(email),
            password_hash,
            credits,
            created_at: now_rfc3339(),
        }
    }
}

/// Emails are compared and stored trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
