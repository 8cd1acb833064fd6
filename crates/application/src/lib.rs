//! Application services and ports.

#![forbid(unsafe_code)]

mod action_result;
mod auth_gateway;
mod auth_service;
mod identity_ports;
mod image_service;
mod listing_ports;
mod listing_service;
mod pkce;
mod profile_service;
mod saved_listing_service;
mod storage_ports;
mod validation;
mod view_invalidation;

#[cfg(test)]
mod test_support;

pub use action_result::{ActionResult, UNEXPECTED_ERROR_MESSAGE};
pub use auth_gateway::{AuthGateway, Caller, RequestContext, ResolvedSession};
pub use auth_service::{AUTH_CALLBACK_PATH, AuthService, PendingSignUp, RESET_PASSWORD_PATH};
pub use identity_ports::{AuthProvider, AuthSession, ProfileRepository};
pub use image_service::{ImageService, ImageUpload, UPLOAD_IMAGES_ACTION, UploadedImage};
pub use listing_ports::{ListingRepository, SavedListingRepository, ViewInvalidator};
pub use listing_service::{ListingQuery, ListingService};
pub use pkce::{PKCE_CHALLENGE_METHOD, PkcePair};
pub use profile_service::ProfileService;
pub use saved_listing_service::{SavedListingChange, SavedListingService};
pub use storage_ports::{ObjectStore, UploadOptions};
pub use validation::{ActionInput, validate_action_input, validate_input};
