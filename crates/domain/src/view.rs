use std::fmt::{Display, Formatter};

use crate::listing::ListingId;

/// Rendered page whose cached output depends on listing or saved-listing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPath {
    /// Public listing index.
    ListingIndex,
    /// Detail page of one listing.
    ListingDetail(ListingId),
    /// Agent listing management page.
    AgentListings,
    /// Admin moderation page.
    AdminListings,
    /// Current user's saved listings.
    SavedListings,
}

impl ViewPath {
    /// Pages affected by creating a listing.
    #[must_use]
    pub fn after_listing_created() -> Vec<Self> {
        vec![Self::ListingIndex, Self::AgentListings, Self::AdminListings]
    }

    /// Pages affected by editing or moderating a listing.
    #[must_use]
    pub fn after_listing_changed(id: ListingId) -> Vec<Self> {
        vec![
            Self::ListingIndex,
            Self::ListingDetail(id),
            Self::AgentListings,
            Self::AdminListings,
            Self::SavedListings,
        ]
    }

    /// Pages affected by deleting a listing.
    #[must_use]
    pub fn after_listing_deleted(id: ListingId) -> Vec<Self> {
        Self::after_listing_changed(id)
    }

    /// Pages affected by any saved-listing change.
    #[must_use]
    pub fn after_saved_listings_changed() -> Vec<Self> {
        vec![Self::SavedListings]
    }
}

impl Display for ViewPath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ListingIndex => formatter.write_str("/listings"),
            Self::ListingDetail(id) => write!(formatter, "/listings/{id}"),
            Self::AgentListings => formatter.write_str("/agent/listings"),
            Self::AdminListings => formatter.write_str("/admin/listings"),
            Self::SavedListings => formatter.write_str("/account/saved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewPath;
    use crate::listing::ListingId;

    #[test]
    fn renders_page_paths() {
        let id = ListingId::new();
        let rendered: Vec<String> = ViewPath::after_listing_changed(id)
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            rendered,
            vec![
                "/listings".to_owned(),
                format!("/listings/{id}"),
                "/agent/listings".to_owned(),
                "/admin/listings".to_owned(),
                "/account/saved".to_owned(),
            ]
        );
    }
}
