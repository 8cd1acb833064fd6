use rentline_application::SavedListingChange;
use rentline_domain::{SaveOutcome, SavedListing, SavedListingEntry};
use serde::Serialize;
use ts_rs::TS;

use super::ListingResponse;

/// API representation of a saved listing record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/saved-listing-response.ts"
)]
pub struct SavedListingResponse {
    pub id: String,
    pub listing_id: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<SavedListing> for SavedListingResponse {
    fn from(saved: SavedListing) -> Self {
        Self {
            id: saved.id.to_string(),
            listing_id: saved.listing_id.to_string(),
            notes: saved.notes,
            created_at: saved.created_at.to_rfc3339(),
        }
    }
}

/// Result of the save action.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/save-listing-response.ts"
)]
pub struct SaveListingResponse {
    pub saved: SavedListingResponse,
    /// `created` on the first save, `updated` when the notes were replaced.
    pub outcome: String,
}

impl From<SavedListingChange> for SaveListingResponse {
    fn from(change: SavedListingChange) -> Self {
        let outcome = match change.outcome {
            SaveOutcome::Created => "created",
            SaveOutcome::Updated => "updated",
        };

        Self {
            saved: change.saved.into(),
            outcome: outcome.to_owned(),
        }
    }
}

/// Saved record joined with its listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/saved-listing-entry-response.ts"
)]
pub struct SavedListingEntryResponse {
    pub saved: SavedListingResponse,
    pub listing: ListingResponse,
}

impl From<SavedListingEntry> for SavedListingEntryResponse {
    fn from(entry: SavedListingEntry) -> Self {
        Self {
            saved: entry.saved.into(),
            listing: entry.listing.into(),
        }
    }
}

/// Identifier of a removed saved listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/removed-saved-listing-response.ts"
)]
pub struct RemovedSavedListingResponse {
    pub id: String,
}
