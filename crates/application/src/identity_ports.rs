use async_trait::async_trait;

use rentline_core::{AppResult, UserId, UserIdentity};
use rentline_domain::{Profile, ProfileUpdate};

/// Session issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Bearer token sent on subsequent provider calls.
    pub access_token: String,
    /// Token used to renew the access token.
    pub refresh_token: Option<String>,
    /// Identity the session belongs to.
    pub user: UserIdentity,
}

/// Port for the hosted authentication provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Registers an account. The confirmation email links back to `email_redirect_to`
    /// with a code bound to `code_challenge`.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        email_redirect_to: &str,
        code_challenge: &str,
    ) -> AppResult<UserIdentity>;

    /// Exchanges credentials for a session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Sends a password reset email linking to `redirect_to` with a code bound to
    /// `code_challenge`.
    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> AppResult<()>;

    /// Sets a new password for the session's user.
    async fn update_user_password(&self, access_token: &str, password: &str) -> AppResult<()>;

    /// Revokes a session.
    async fn sign_out(&self, access_token: &str) -> AppResult<()>;

    /// Resolves the user behind an access token. `None` when the token is not accepted.
    async fn get_user(&self, access_token: &str) -> AppResult<Option<UserIdentity>>;

    /// Exchanges a one-time callback code and the verifier of its challenge for a session.
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> AppResult<AuthSession>;

    /// Trades a refresh token for a new session. Refresh tokens are single-use.
    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession>;
}

/// Repository port for profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a profile by its user id.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<Profile>>;

    /// Stores a profile unless one already exists for the user. Returns the stored profile.
    async fn insert_if_missing(&self, profile: Profile) -> AppResult<Profile>;

    /// Applies a self-service update. Returns `None` when the profile does not exist.
    async fn update(&self, user_id: UserId, update: ProfileUpdate) -> AppResult<Option<Profile>>;
}
