use axum::Json;
use axum::extract::{Extension, State};
use axum::response::Response;
use rentline_application::RequestContext;

use crate::dto::ProfileResponse;
use crate::error::{ApiResult, action_response};
use crate::extract::ActionPayload;
use crate::state::AppState;

/// GET /api/profile
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state.profile_service.get_profile(&context).await?;
    Ok(Json(profile.into()))
}

/// PUT /api/profile - Update name and avatar. The role is never taken from input.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    ActionPayload(input): ActionPayload,
) -> Response {
    let result = state.profile_service.update_profile(&context, input).await;
    action_response("update profile", result.map(ProfileResponse::from))
}
