//! Domain entities, validation schemas and invariants.

#![forbid(unsafe_code)]

mod form;
mod image;
mod listing;
mod profile;
mod role;
mod saved_listing;
/// Declarative schema engine.
pub mod schema;
/// Schema registry for every mutable entity and narrow action input.
pub mod schemas;
mod view;

pub use form::{LIST_MARKER, normalize_form};
pub use image::{
    ALLOWED_IMAGE_TYPES, ImageObjectPath, LISTING_IMAGE_BUCKET, MAX_IMAGE_BYTES,
    validate_image_upload,
};
pub use listing::{
    ApprovalDecision, DEFAULT_PAGE_SIZE, Listing, ListingChanges, ListingDraft, ListingFilter,
    ListingId, ListingPage, MAX_PAGE_SIZE, NewListing, PageRequest,
};
pub use profile::{Profile, ProfileUpdate};
pub use role::Role;
pub use saved_listing::{
    RemoveSavedListingRequest, SaveListingRequest, SaveOutcome, SavedListing, SavedListingEntry,
    SavedListingId, UpdateSavedListingRequest,
};
pub use schema::{EntitySchema, FieldKind};
pub use view::ViewPath;
