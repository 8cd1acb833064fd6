use rentline_application::AuthSession;
use rentline_core::AppError;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

mod callback;
mod password;
mod session;

pub use callback::auth_callback_handler;
pub use password::{
    forgot_password_handler, reset_password_handler, sign_in_handler, sign_up_handler,
};
pub use session::{me_handler, sign_out_handler};

const SESSION_TOKENS_KEY: &str = "provider_tokens";
const SESSION_CODE_VERIFIER_KEY: &str = "pkce_code_verifier";

/// Provider tokens kept server-side for the signed-in browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl From<AuthSession> for SessionTokens {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }
    }
}

pub async fn stored_tokens(session: &Session) -> Result<Option<SessionTokens>, AppError> {
    session
        .get::<SessionTokens>(SESSION_TOKENS_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session tokens: {error}")))
}

/// Stores tokens under a fresh session id.
async fn store_tokens(session: &Session, tokens: SessionTokens) -> Result<(), AppError> {
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to rotate session id: {error}")))?;
    replace_tokens(session, tokens).await
}

/// Overwrites the tokens of an established session, e.g. after a refresh.
pub async fn replace_tokens(session: &Session, tokens: SessionTokens) -> Result<(), AppError> {
    session
        .insert(SESSION_TOKENS_KEY, tokens)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session tokens: {error}")))
}

/// Keeps the verifier of an emailed link until its callback arrives.
async fn store_code_verifier(session: &Session, code_verifier: String) -> Result<(), AppError> {
    session
        .insert(SESSION_CODE_VERIFIER_KEY, code_verifier)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist code verifier: {error}")))
}

/// Removes and returns the pending code verifier.
async fn take_code_verifier(session: &Session) -> Result<Option<String>, AppError> {
    session
        .remove::<String>(SESSION_CODE_VERIFIER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read code verifier: {error}")))
}
