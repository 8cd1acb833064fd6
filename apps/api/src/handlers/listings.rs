use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::response::Response;
use rentline_application::RequestContext;
use rentline_domain::ListingId;

use crate::dto::{
    DeletedListingResponse, ListingIndexQuery, ListingPageResponse, ListingResponse, PageQuery,
};
use crate::error::{ApiResult, action_response};
use crate::extract::ActionPayload;
use crate::state::AppState;

/// GET /api/listings - Approved listings matching the index filters.
pub async fn list_listings_handler(
    State(state): State<AppState>,
    Query(query): Query<ListingIndexQuery>,
) -> ApiResult<Json<ListingPageResponse>> {
    let window = query.window();
    let page = state
        .listing_service
        .list_listings(query.filter(), window)
        .await?;

    Ok(Json(ListingPageResponse::new(page, window)))
}

/// GET /api/listings/property-types
pub async fn list_property_types_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.listing_service.list_property_types().await?))
}

/// GET /api/listings/mine - The caller's own listings, including unapproved ones.
pub async fn list_my_listings_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ListingPageResponse>> {
    let window = query.window();
    let page = state
        .listing_service
        .list_my_listings(&context, window)
        .await?;

    Ok(Json(ListingPageResponse::new(page, window)))
}

/// GET /api/listings/moderation - Every listing, for admins.
pub async fn list_all_listings_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ListingPageResponse>> {
    let window = query.window();
    let page = state
        .listing_service
        .list_all_listings(&context, window)
        .await?;

    Ok(Json(ListingPageResponse::new(page, window)))
}

/// GET /api/listings/{listing_id}
pub async fn get_listing_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(listing_id): Path<String>,
) -> ApiResult<Json<ListingResponse>> {
    let listing = state
        .listing_service
        .get_listing(&context, listing_id.parse::<ListingId>()?)
        .await?;

    Ok(Json(listing.into()))
}

/// POST /api/listings - Create a listing from a form or JSON body.
pub async fn create_listing_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    ActionPayload(input): ActionPayload,
) -> Response {
    let result = state.listing_service.create_listing(&context, input).await;
    action_response("create listing", result.map(ListingResponse::from))
}

/// PUT /api/listings/{listing_id}
pub async fn update_listing_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(listing_id): Path<String>,
    ActionPayload(input): ActionPayload,
) -> Response {
    let result = match listing_id.parse::<ListingId>() {
        Ok(id) => state.listing_service.update_listing(&context, id, input).await,
        Err(error) => Err(error),
    };

    action_response("update listing", result.map(ListingResponse::from))
}

/// DELETE /api/listings/{listing_id}
pub async fn delete_listing_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Path(listing_id): Path<String>,
) -> Response {
    let result = match listing_id.parse::<ListingId>() {
        Ok(id) => state.listing_service.delete_listing(&context, id).await,
        Err(error) => Err(error),
    };

    action_response(
        "delete listing",
        result.map(|id| DeletedListingResponse { id: id.to_string() }),
    )
}

/// POST /api/listings/approval - Approve or reject a listing, optionally featuring it.
pub async fn approve_listing_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    ActionPayload(input): ActionPayload,
) -> Response {
    let result = state.listing_service.approve_listing(&context, input).await;
    action_response("approve listing", result.map(ListingResponse::from))
}
