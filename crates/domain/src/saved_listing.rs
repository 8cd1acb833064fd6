use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use rentline_core::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::listing::{Listing, ListingId};

/// Identifier of a saved listing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedListingId(Uuid);

impl SavedListingId {
    /// Creates a random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SavedListingId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SavedListingId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A user's bookmark of a listing. At most one exists per user and listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedListing {
    /// Record identifier.
    pub id: SavedListingId,
    /// Owning user.
    pub user_id: UserId,
    /// Bookmarked listing.
    pub listing_id: ListingId,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Time of the first save.
    pub created_at: DateTime<Utc>,
}

/// Input of the save action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveListingRequest {
    /// Listing to bookmark.
    pub listing_id: ListingId,
    /// Notes to store. On re-save they replace the stored notes; absent notes keep them.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input of the notes edit action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateSavedListingRequest {
    /// Saved record to edit.
    pub id: SavedListingId,
    /// New notes; `None` clears them.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input of the remove action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RemoveSavedListingRequest {
    /// Saved record to remove.
    pub id: SavedListingId,
}

/// Whether a save inserted a record or refreshed the notes of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    /// First save of this listing by this user.
    Created,
    /// Listing was already saved; any supplied notes replaced the stored ones.
    Updated,
}

/// Saved record joined with the listing it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedListingEntry {
    /// Bookmark record.
    pub saved: SavedListing,
    /// Bookmarked listing.
    pub listing: Listing,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{SaveListingRequest, SaveOutcome};

    #[test]
    fn save_request_notes_are_optional() {
        let request = serde_json::from_value::<SaveListingRequest>(json!({
            "listing_id": "0b3c34f6-5b44-4d38-9a0c-7c2f2f0c1a11",
        }));

        assert!(matches!(request, Ok(SaveListingRequest { notes: None, .. })));
    }

    #[test]
    fn outcome_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_value(SaveOutcome::Updated).unwrap_or_default(),
            json!("updated")
        );
    }
}
