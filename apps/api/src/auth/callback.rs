use axum::extract::{Query, State};
use axum::response::Redirect;
use tower_sessions::Session;
use tracing::info;

use crate::dto::AuthCallbackQuery;
use crate::error::ApiResult;
use crate::state::AppState;

use super::{SessionTokens, store_tokens, take_code_verifier};

/// Landing page after a successful callback without `redirect_to`.
const DEFAULT_REDIRECT_PATH: &str = "/protected";

/// GET /auth/callback - Exchange an emailed code for a session and redirect.
///
/// The code is bound to the verifier this browser's session kept at sign-up or
/// password-reset time.
pub async fn auth_callback_handler(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AuthCallbackQuery>,
) -> ApiResult<Redirect> {
    if let Some(code) = query.code.as_deref().filter(|code| !code.is_empty()) {
        let code_verifier = take_code_verifier(&session).await?;
        let provider_session = state
            .auth_service
            .exchange_code(code, code_verifier.as_deref())
            .await?;

        let user_id = provider_session.user.user_id();
        store_tokens(&session, SessionTokens::from(provider_session)).await?;
        info!(user_id = %user_id, "callback session established");
    }

    let path = redirect_path(query.redirect_to.as_deref());
    Ok(Redirect::to(&format!("{}{path}", state.frontend_url)))
}

/// Keeps only same-site absolute paths.
fn redirect_path(redirect_to: Option<&str>) -> &str {
    redirect_to
        .filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
        .unwrap_or(DEFAULT_REDIRECT_PATH)
}
