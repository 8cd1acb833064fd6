use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use rentline_core::AppError;
use rentline_domain::MAX_IMAGE_BYTES;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;


/// Room for oversized photos to reach type and size validation.
const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES * 2;

pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/listings/mine",
            get(handlers::listings::list_my_listings_handler),
        )
        .route(
            "/api/listings/moderation",
            get(handlers::listings::list_all_listings_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let auth_routes = Router::new()
        .route("/auth/sign-up", post(auth::sign_up_handler))
        .route("/auth/sign-in", post(auth::sign_in_handler))
        .route("/auth/sign-out", post(auth::sign_out_handler))
        .route("/auth/forgot-password", post(auth::forgot_password_handler))
        .route("/auth/reset-password", post(auth::reset_password_handler))
        .route("/auth/callback", get(auth::auth_callback_handler));

    let listing_routes = Router::new()
        .route(
            "/api/listings",
            get(handlers::listings::list_listings_handler)
                .post(handlers::listings::create_listing_handler),
        )
        .route(
            "/api/listings/property-types",
            get(handlers::listings::list_property_types_handler),
        )
        .route(
            "/api/listings/approval",
            post(handlers::listings::approve_listing_handler),
        )
        .route(
            "/api/listings/{listing_id}",
            get(handlers::listings::get_listing_handler)
                .put(handlers::listings::update_listing_handler)
                .delete(handlers::listings::delete_listing_handler),
        )
        .route(
            "/api/saved-listings",
            get(handlers::saved_listings::list_saved_listings_handler)
                .post(handlers::saved_listings::save_listing_handler)
                .put(handlers::saved_listings::update_saved_listing_handler)
                .delete(handlers::saved_listings::remove_saved_listing_handler),
        )
        .route(
            "/api/images",
            post(handlers::images::upload_image_handler)
                .delete(handlers::images::delete_image_handler)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/profile",
            get(handlers::profile::get_profile_handler)
                .put(handlers::profile::update_profile_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(auth_routes)
        .merge(listing_routes)
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::resolve_request_context,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
