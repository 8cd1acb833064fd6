use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use rentline_application::RequestContext;
use rentline_core::AppError;
use tower_sessions::Session;

use crate::dto::SessionUserResponse;
use crate::error::ApiResult;
use crate::state::AppState;

use super::stored_tokens;

/// POST /auth/sign-out - Revoke the provider session and drop the server session.
pub async fn sign_out_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<StatusCode> {
    if let Some(tokens) = stored_tokens(&session).await? {
        state.auth_service.sign_out(&tokens.access_token).await;
    }

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Identity and role of the signed-in user.
pub async fn me_handler(
    Extension(context): Extension<RequestContext>,
) -> ApiResult<Json<SessionUserResponse>> {
    let caller = context.require_auth("view your session")?;
    Ok(Json(SessionUserResponse::from(caller)))
}
