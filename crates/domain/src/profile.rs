use chrono::{DateTime, Utc};
use rentline_core::UserId;
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Role record keyed one-to-one to an auth identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Same identifier as the auth identity.
    pub id: UserId,
    /// Display name.
    pub full_name: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Authorization role. Only promoted out of band.
    pub role: Role,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Creates the profile given to every new sign-up.
    #[must_use]
    pub fn new_user(id: UserId, full_name: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            full_name,
            avatar_url: None,
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a self-service update. The role is left untouched.
    pub fn apply(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        self.full_name = Some(update.full_name);
        self.avatar_url = update.avatar_url;
        self.updated_at = now;
    }
}

/// Self-service profile changes. Any `role` in the input is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    /// New display name.
    pub full_name: String,
    /// New avatar URL; `None` clears it.
    #[serde(default)]
    pub avatar_url: Option<String>,
}
