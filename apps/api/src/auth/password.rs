use axum::Json;
use axum::extract::State;
use tower_sessions::Session;

use crate::dto::{
    ForgotPasswordRequest, GenericMessageResponse, ResetPasswordRequest, SessionUserResponse,
    SignInRequest, SignUpRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{SessionTokens, store_code_verifier, store_tokens, stored_tokens};

/// POST /auth/sign-up - Create an account and its `user` profile.
pub async fn sign_up_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SignUpRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    let pending = state
        .auth_service
        .sign_up(&payload.email, &payload.password, &state.frontend_url)
        .await?;
    store_code_verifier(&session, pending.code_verifier).await?;

    Ok(Json(GenericMessageResponse::new(
        "Thanks for signing up! Please check your email for a verification link.",
    )))
}

/// POST /auth/sign-in - Sign in with email+password and keep the provider session.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SignInRequest>,
) -> ApiResult<Json<SessionUserResponse>> {
    let provider_session = state
        .auth_service
        .sign_in(&payload.email, &payload.password)
        .await?;

    let context = state
        .auth_gateway
        .resolve(Some(provider_session.access_token.as_str()))
        .await?;
    let caller = context.require_auth("sign in")?;
    let response = SessionUserResponse::from(caller);

    store_tokens(&session, SessionTokens::from(provider_session)).await?;

    Ok(Json(response))
}

/// POST /auth/forgot-password - Send a reset link that signs in and opens the reset page.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    let code_verifier = state
        .auth_service
        .forgot_password(&payload.email, &state.frontend_url)
        .await?;
    store_code_verifier(&session, code_verifier).await?;

    Ok(Json(GenericMessageResponse::new(
        "Check your email for a link to reset your password.",
    )))
}

/// POST /auth/reset-password - Set a new password for the signed-in user.
pub async fn reset_password_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    let tokens = stored_tokens(&session).await?;
    state
        .auth_service
        .reset_password(
            tokens.as_ref().map(|tokens| tokens.access_token.as_str()),
            &payload.password,
            &payload.confirm_password,
        )
        .await?;

    Ok(Json(GenericMessageResponse::new("Password updated")))
}
