use axum::Json;
use axum::extract::{Extension, State};
use axum::response::Response;
use rentline_application::RequestContext;

use crate::dto::{
    RemovedSavedListingResponse, SaveListingResponse, SavedListingEntryResponse,
    SavedListingResponse,
};
use crate::error::{ApiResult, action_response};
use crate::extract::ActionPayload;
use crate::state::AppState;

/// GET /api/saved-listings - The caller's saved listings with their listings.
pub async fn list_saved_listings_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> ApiResult<Json<Vec<SavedListingEntryResponse>>> {
    let entries = state
        .saved_listing_service
        .list_saved_listings(&context)
        .await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /api/saved-listings - Save a listing, or replace its notes when already saved.
pub async fn save_listing_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    ActionPayload(input): ActionPayload,
) -> Response {
    let result = state
        .saved_listing_service
        .save_listing(&context, input)
        .await;

    action_response("save listing", result.map(SaveListingResponse::from))
}

/// PUT /api/saved-listings - Replace the notes of a saved listing.
pub async fn update_saved_listing_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    ActionPayload(input): ActionPayload,
) -> Response {
    let result = state
        .saved_listing_service
        .update_saved_listing_notes(&context, input)
        .await;

    action_response(
        "update saved listing",
        result.map(SavedListingResponse::from),
    )
}

/// DELETE /api/saved-listings - Remove a saved listing by record id.
pub async fn remove_saved_listing_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    ActionPayload(input): ActionPayload,
) -> Response {
    let result = state
        .saved_listing_service
        .remove_saved_listing(&context, input)
        .await;

    action_response(
        "remove saved listing",
        result.map(|id| RemovedSavedListingResponse { id: id.to_string() }),
    )
}
