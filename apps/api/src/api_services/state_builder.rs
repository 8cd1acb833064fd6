use std::sync::Arc;

use rentline_application::{
    AuthGateway, AuthService, ImageService, ListingRepository, ListingService, ProfileRepository,
    ProfileService, SavedListingService, ViewInvalidator,
};
use rentline_core::AppError;
use rentline_infrastructure::{
    HttpAuthProvider, HttpObjectStore, PostgresListingRepository, PostgresProfileRepository,
    PostgresSavedListingRepository, RedisViewInvalidator, TracingViewInvalidator,
};
use sqlx::PgPool;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::redis::build_redis_client;

/// Redis channel carrying stale view paths.
const VIEW_INVALIDATION_CHANNEL: &str = "rentline:view-invalidations";

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let http_client = reqwest::Client::new();
    let auth_provider = Arc::new(HttpAuthProvider::new(
        http_client.clone(),
        &config.auth_provider_url,
        config.auth_provider_anon_key.clone(),
    )?);
    let object_store = Arc::new(HttpObjectStore::new(
        http_client,
        &config.auth_provider_url,
        config.storage_service_key.clone(),
        config.storage_bucket.clone(),
    )?);

    let profile_repository: Arc<dyn ProfileRepository> =
        Arc::new(PostgresProfileRepository::new(pool.clone()));
    let listing_repository: Arc<dyn ListingRepository> =
        Arc::new(PostgresListingRepository::new(pool.clone()));
    let saved_listing_repository = Arc::new(PostgresSavedListingRepository::new(pool));
    let view_invalidator = build_view_invalidator(config)?;

    Ok(AppState {
        auth_gateway: AuthGateway::new(auth_provider.clone(), profile_repository.clone()),
        auth_service: AuthService::new(auth_provider, profile_repository.clone()),
        listing_service: ListingService::new(listing_repository.clone(), view_invalidator.clone()),
        saved_listing_service: SavedListingService::new(
            saved_listing_repository,
            listing_repository,
            view_invalidator,
        ),
        image_service: ImageService::new(object_store),
        profile_service: ProfileService::new(profile_repository),
        frontend_url: config.frontend_url.clone(),
    })
}

fn build_view_invalidator(config: &ApiConfig) -> Result<Arc<dyn ViewInvalidator>, AppError> {
    match config.redis_url.as_deref() {
        Some(redis_url) => {
            info!("publishing view invalidations on redis");
            Ok(Arc::new(RedisViewInvalidator::new(
                build_redis_client(redis_url)?,
                VIEW_INVALIDATION_CHANNEL,
            )))
        }
        None => Ok(Arc::new(TracingViewInvalidator)),
    }
}
