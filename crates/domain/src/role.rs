use std::str::FromStr;

use rentline_core::AppError;
use serde::{Deserialize, Serialize};

/// Role stored on a user's profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browses listings and keeps saved listings.
    #[default]
    User,
    /// Publishes listings that wait for approval.
    Agent,
    /// Publishes pre-approved listings and moderates everything.
    Admin,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[Role::User, Role::Agent, Role::Admin];

        ALL
    }

    /// Returns whether the role may create listings.
    #[must_use]
    pub fn can_publish_listings(&self) -> bool {
        matches!(self, Self::Agent | Self::Admin)
    }

    /// Returns whether the role carries moderation authority.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "agent" => Ok(Self::Agent),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Role;

    #[test]
    fn role_roundtrip_storage_value() {
        for role in Role::all() {
            let restored = Role::from_str(role.as_str());
            assert!(matches!(restored, Ok(value) if value == *role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn only_agents_and_admins_publish() {
        assert!(!Role::User.can_publish_listings());
        assert!(Role::Agent.can_publish_listings());
        assert!(Role::Admin.can_publish_listings());
        assert_eq!(Role::default(), Role::User);
    }
}
