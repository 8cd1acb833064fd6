use async_trait::async_trait;

use rentline_core::{AppResult, UserId};
use rentline_domain::{
    Listing, ListingChanges, ListingFilter, ListingId, ListingPage, NewListing, PageRequest,
    SaveOutcome, SavedListing, SavedListingId, ViewPath,
};

/// Repository port for listing persistence.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Inserts a new listing and returns the stored row.
    async fn insert(&self, listing: NewListing) -> AppResult<Listing>;

    /// Finds one listing by id.
    async fn find_by_id(&self, id: ListingId) -> AppResult<Option<Listing>>;

    /// Finds every listing whose id is in the given set. Missing ids are skipped.
    async fn find_many(&self, ids: &[ListingId]) -> AppResult<Vec<Listing>>;

    /// Applies a partial update. Returns `None` when the listing does not exist.
    async fn update(&self, id: ListingId, changes: ListingChanges) -> AppResult<Option<Listing>>;

    /// Sets moderation flags. Returns `None` when the listing does not exist.
    async fn set_moderation(
        &self,
        id: ListingId,
        approved: bool,
        featured: bool,
    ) -> AppResult<Option<Listing>>;

    /// Deletes a listing. Returns whether a row was removed.
    async fn delete(&self, id: ListingId) -> AppResult<bool>;

    /// Lists listings matching a filter, newest first.
    async fn list(&self, filter: &ListingFilter, page: PageRequest) -> AppResult<ListingPage>;

    /// Lists distinct property types of approved listings, sorted.
    async fn list_property_types(&self) -> AppResult<Vec<String>>;
}

/// Repository port for saved listings.
#[async_trait]
pub trait SavedListingRepository: Send + Sync {
    /// Inserts a save for `(user_id, listing_id)` or, atomically, replaces the
    /// notes of the existing one. `None` leaves existing notes untouched.
    async fn upsert(
        &self,
        user_id: UserId,
        listing_id: ListingId,
        notes: Option<String>,
    ) -> AppResult<(SavedListing, SaveOutcome)>;

    /// Replaces the notes of a saved record owned by the user.
    async fn update_notes(
        &self,
        id: SavedListingId,
        user_id: UserId,
        notes: Option<String>,
    ) -> AppResult<Option<SavedListing>>;

    /// Deletes a saved record owned by the user. Returns whether a row was removed.
    async fn delete_for_user(&self, id: SavedListingId, user_id: UserId) -> AppResult<bool>;

    /// Lists a user's saved records, newest first.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<SavedListing>>;
}

/// Port signalling the rendering layer that cached pages are stale.
#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    /// Marks the given pages stale.
    async fn invalidate(&self, paths: &[ViewPath]) -> AppResult<()>;
}
