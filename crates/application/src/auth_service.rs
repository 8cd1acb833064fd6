//! Account actions delegated to the hosted auth provider.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use rentline_core::{AppError, AppResult, UserId};
use rentline_domain::Profile;

use crate::{AuthProvider, AuthSession, PkcePair, ProfileRepository};

/// Callback that exchanges emailed codes for a session.
pub const AUTH_CALLBACK_PATH: &str = "/auth/callback";

/// Page the password reset link ends on.
pub const RESET_PASSWORD_PATH: &str = "/protected/reset-password";

/// Registration waiting for its email confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSignUp {
    /// Registered user.
    pub user_id: UserId,
    /// Verifier the confirmation code is exchanged with.
    pub code_verifier: String,
}

/// Application service for sign-up, sign-in and password flows.
#[derive(Clone)]
pub struct AuthService {
    auth_provider: Arc<dyn AuthProvider>,
    profile_repository: Arc<dyn ProfileRepository>,
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(
        auth_provider: Arc<dyn AuthProvider>,
        profile_repository: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            auth_provider,
            profile_repository,
        }
    }

    /// Registers an account and gives it a `user` profile.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        origin: &str,
    ) -> AppResult<PendingSignUp> {
        require_credentials(email, password)?;

        let pkce = PkcePair::generate()?;
        let identity = self
            .auth_provider
            .sign_up(
                email,
                password,
                &format!("{origin}{AUTH_CALLBACK_PATH}"),
                pkce.challenge(),
            )
            .await?;
        self.profile_repository
            .insert_if_missing(Profile::new_user(identity.user_id(), None, Utc::now()))
            .await?;

        info!(user_id = %identity.user_id(), "account registered");
        Ok(PendingSignUp {
            user_id: identity.user_id(),
            code_verifier: pkce.into_verifier(),
        })
    }

    /// Signs in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        require_credentials(email, password)?;

        self.auth_provider
            .sign_in_with_password(email, password)
            .await
            .map_err(|error| {
                warn!(error = %error, "password sign-in rejected");
                AppError::Unauthenticated("Invalid email or password".to_owned())
            })
    }

    /// Sends a password reset email whose link signs in through the callback and
    /// lands on the reset page. Returns the verifier for that code.
    pub async fn forgot_password(&self, email: &str, origin: &str) -> AppResult<String> {
        if email.trim().is_empty() {
            return Err(AppError::Validation("Email is required".to_owned()));
        }

        let pkce = PkcePair::generate()?;
        self.auth_provider
            .reset_password_for_email(
                email,
                &format!("{origin}{AUTH_CALLBACK_PATH}?redirect_to={RESET_PASSWORD_PATH}"),
                pkce.challenge(),
            )
            .await
            .map_err(|error| {
                warn!(error = %error, "password reset email failed");
                AppError::Remote("Could not reset password".to_owned())
            })?;

        Ok(pkce.into_verifier())
    }

    /// Sets a new password for the signed-in user.
    pub async fn reset_password(
        &self,
        access_token: Option<&str>,
        password: &str,
        confirm_password: &str,
    ) -> AppResult<()> {
        let access_token = access_token.ok_or_else(|| {
            AppError::Unauthenticated("You must be logged in to reset your password".to_owned())
        })?;
        if password.is_empty() || confirm_password.is_empty() {
            return Err(AppError::Validation("Passwords are required".to_owned()));
        }
        if password != confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_owned()));
        }

        self.auth_provider
            .update_user_password(access_token, password)
            .await
            .map_err(|error| {
                warn!(error = %error, "password update failed");
                AppError::Remote("Password update failed".to_owned())
            })
    }

    /// Revokes the provider session. Provider failures are logged only.
    pub async fn sign_out(&self, access_token: &str) {
        if let Err(error) = self.auth_provider.sign_out(access_token).await {
            warn!(error = %error, "provider sign-out failed");
        }
    }

    /// Exchanges a callback code for a session and makes sure a profile exists.
    ///
    /// `code_verifier` is the one kept when the emailed flow started; without
    /// it the link was opened in another browser.
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> AppResult<AuthSession> {
        let code_verifier = code_verifier.ok_or_else(|| {
            AppError::Validation(
                "Open the link in the browser you requested it from".to_owned(),
            )
        })?;

        let session = self
            .auth_provider
            .exchange_code_for_session(code, code_verifier)
            .await?;
        self.profile_repository
            .insert_if_missing(Profile::new_user(session.user.user_id(), None, Utc::now()))
            .await?;

        Ok(session)
    }
}

fn require_credentials(email: &str, password: &str) -> AppResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Missing email or password".to_owned(),
        ));
    }

    Ok(())
}
