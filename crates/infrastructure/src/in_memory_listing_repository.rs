use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rentline_application::ListingRepository;
use rentline_core::{AppError, AppResult};
use rentline_domain::{
    Listing, ListingChanges, ListingFilter, ListingId, ListingPage, NewListing, PageRequest,
};
use tokio::sync::RwLock;

/// In-memory listing repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryListingRepository {
    listings: RwLock<HashMap<ListingId, Listing>>,
}

impl InMemoryListingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn insert(&self, listing: NewListing) -> AppResult<Listing> {
        let listing = Listing::create(ListingId::new(), listing, Utc::now());
        self.listings
            .write()
            .await
            .insert(listing.id, listing.clone());

        Ok(listing)
    }

    async fn find_by_id(&self, id: ListingId) -> AppResult<Option<Listing>> {
        Ok(self.listings.read().await.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[ListingId]) -> AppResult<Vec<Listing>> {
        let listings = self.listings.read().await;
        Ok(ids.iter().filter_map(|id| listings.get(id).cloned()).collect())
    }

    async fn update(&self, id: ListingId, changes: ListingChanges) -> AppResult<Option<Listing>> {
        let mut listings = self.listings.write().await;
        Ok(listings.get_mut(&id).map(|listing| {
            listing.apply(changes, Utc::now());
            listing.clone()
        }))
    }

    async fn set_moderation(
        &self,
        id: ListingId,
        approved: bool,
        featured: bool,
    ) -> AppResult<Option<Listing>> {
        let mut listings = self.listings.write().await;
        Ok(listings.get_mut(&id).map(|listing| {
            listing.approved = approved;
            listing.featured = featured;
            listing.updated_at = Utc::now();
            listing.clone()
        }))
    }

    async fn delete(&self, id: ListingId) -> AppResult<bool> {
        Ok(self.listings.write().await.remove(&id).is_some())
    }

    async fn list(&self, filter: &ListingFilter, page: PageRequest) -> AppResult<ListingPage> {
        let listings = self.listings.read().await;
        let mut matching: Vec<&Listing> = listings
            .values()
            .filter(|listing| filter.matches(listing))
            .collect();
        matching.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| left.id.cmp(&right.id))
        });

        let total = u64::try_from(matching.len())
            .map_err(|error| AppError::Internal(format!("invalid listing count: {error}")))?;
        let offset = usize::try_from(page.offset())
            .map_err(|error| AppError::Internal(format!("invalid listing offset: {error}")))?;
        let limit = usize::try_from(page.limit())
            .map_err(|error| AppError::Internal(format!("invalid listing limit: {error}")))?;

        Ok(ListingPage {
            listings: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
            total,
        })
    }

    async fn list_property_types(&self) -> AppResult<Vec<String>> {
        let mut property_types: Vec<String> = self
            .listings
            .read()
            .await
            .values()
            .filter(|listing| listing.approved)
            .map(|listing| listing.details.property_type.clone())
            .collect();
        property_types.sort();
        property_types.dedup();

        Ok(property_types)
    }
}
