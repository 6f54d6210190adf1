//! Users and diver profiles.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// A dashboard account. Divers, instructors and dive guides are all users.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub is_admin: bool,

    #[serde(default)]
    pub profile: Profile,
}

impl User {
    pub fn full_name(&self) -> &str {
        &self.profile.full_name
    }

    /// Admin rights come from either the account flag or the profile role.
    pub fn has_admin_role(&self) -> bool {
        self.is_admin || self.profile.role.as_deref() == Some("admin")
    }
}

/// Diver profile. Every field may be missing on the remote side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub full_name: String,

    /// Certification level (e.g., "Open Water", "Advanced", "Divemaster")
    pub cert_level: String,

    /// Equipment preference (e.g., "Full kit", "Own BCD")
    pub equipment: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Successful login: the user and the bearer token for later requests.
///
/// Matches the remote `tokenAuth { token user }` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}
