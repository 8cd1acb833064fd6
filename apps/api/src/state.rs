use rentline_application::{
    AuthGateway, AuthService, ImageService, ListingService, ProfileService, SavedListingService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_gateway: AuthGateway,
    pub auth_service: AuthService,
    pub listing_service: ListingService,
    pub saved_listing_service: SavedListingService,
    pub image_service: ImageService,
    pub profile_service: ProfileService,
    pub frontend_url: String,
}
