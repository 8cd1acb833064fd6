mod auth;
mod common;
mod images;
mod listings;
mod profile;
mod saved_listings;

pub use auth::{
    AuthCallbackQuery, ForgotPasswordRequest, ResetPasswordRequest, SessionUserResponse,
    SignInRequest, SignUpRequest,
};
pub use common::{GenericMessageResponse, HealthResponse};
pub use images::{DeletedImageResponse, UploadedImageResponse};
pub use listings::{
    DeletedListingResponse, ListingIndexQuery, ListingPageResponse, ListingResponse, PageQuery,
};
pub use profile::ProfileResponse;
pub use saved_listings::{
    RemovedSavedListingResponse, SaveListingResponse, SavedListingEntryResponse,
    SavedListingResponse,
};
