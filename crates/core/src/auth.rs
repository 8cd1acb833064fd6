use serde::{Deserialize, Serialize};

use crate::UserId;

/// User information resolved from the auth provider for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    email: Option<String>,
}

impl UserIdentity {
    /// Creates a user identity from auth provider data.
    #[must_use]
    pub fn new(user_id: UserId, email: Option<String>) -> Self {
        Self { user_id, email }
    }

    /// Returns the stable user identifier issued by the auth provider.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
