//! Saved-listing actions.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use rentline_core::{AppError, AppResult};
use rentline_domain::schemas::{REMOVE_SAVED_LISTING, SAVE_LISTING, UPDATE_SAVED_LISTING};
use rentline_domain::{
    RemoveSavedListingRequest, SaveListingRequest, SaveOutcome, SavedListing, SavedListingEntry,
    SavedListingId, UpdateSavedListingRequest, ViewPath,
};

use crate::listing_service::remote_failure;
use crate::view_invalidation::invalidate_views;
use crate::{
    ActionInput, ListingRepository, RequestContext, SavedListingRepository, ViewInvalidator,
    validate_action_input,
};

/// Saved record returned by the save action, with what the save did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedListingChange {
    /// Stored record after the save.
    pub saved: SavedListing,
    /// Whether the record was created or its notes replaced.
    pub outcome: SaveOutcome,
}

/// Application service for saved listings.
#[derive(Clone)]
pub struct SavedListingService {
    saved_listings: Arc<dyn SavedListingRepository>,
    listings: Arc<dyn ListingRepository>,
    view_invalidator: Arc<dyn ViewInvalidator>,
}

impl SavedListingService {
    /// Creates a new saved-listing service.
    #[must_use]
    pub fn new(
        saved_listings: Arc<dyn SavedListingRepository>,
        listings: Arc<dyn ListingRepository>,
        view_invalidator: Arc<dyn ViewInvalidator>,
    ) -> Self {
        Self {
            saved_listings,
            listings,
            view_invalidator,
        }
    }

    /// Saves a listing for the caller. A re-save replaces the notes only when new ones are given.
    pub async fn save_listing(
        &self,
        context: &RequestContext,
        input: ActionInput,
    ) -> AppResult<SavedListingChange> {
        let caller = context.require_auth("save a listing")?;
        let request: SaveListingRequest = validate_action_input(&SAVE_LISTING, input)?;

        if self
            .listings
            .find_by_id(request.listing_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Listing not found".to_owned()));
        }

        let (saved, outcome) = self
            .saved_listings
            .upsert(caller.user_id(), request.listing_id, request.notes)
            .await
            .map_err(|error| remote_failure("Failed to save listing", error))?;

        info!(
            saved_listing_id = %saved.id,
            listing_id = %saved.listing_id,
            user_id = %caller.user_id(),
            outcome = ?outcome,
            "listing saved"
        );
        invalidate_views(
            self.view_invalidator.as_ref(),
            &ViewPath::after_saved_listings_changed(),
        )
        .await;

        Ok(SavedListingChange { saved, outcome })
    }

    /// Removes one of the caller's saved listings.
    pub async fn remove_saved_listing(
        &self,
        context: &RequestContext,
        input: ActionInput,
    ) -> AppResult<SavedListingId> {
        let caller = context.require_auth("remove a saved listing")?;
        let request: RemoveSavedListingRequest =
            validate_action_input(&REMOVE_SAVED_LISTING, input)?;

        let removed = self
            .saved_listings
            .delete_for_user(request.id, caller.user_id())
            .await
            .map_err(|error| remote_failure("Failed to remove saved listing", error))?;
        if !removed {
            return Err(saved_listing_not_owned("delete"));
        }

        info!(saved_listing_id = %request.id, user_id = %caller.user_id(), "saved listing removed");
        invalidate_views(
            self.view_invalidator.as_ref(),
            &ViewPath::after_saved_listings_changed(),
        )
        .await;

        Ok(request.id)
    }

    /// Replaces the notes on one of the caller's saved listings.
    pub async fn update_saved_listing_notes(
        &self,
        context: &RequestContext,
        input: ActionInput,
    ) -> AppResult<SavedListing> {
        let caller = context.require_auth("update a saved listing")?;
        let request: UpdateSavedListingRequest =
            validate_action_input(&UPDATE_SAVED_LISTING, input)?;

        let saved = self
            .saved_listings
            .update_notes(request.id, caller.user_id(), request.notes)
            .await
            .map_err(|error| remote_failure("Failed to update saved listing", error))?
            .ok_or_else(|| saved_listing_not_owned("update"))?;

        info!(saved_listing_id = %saved.id, user_id = %caller.user_id(), "saved listing notes updated");
        invalidate_views(
            self.view_invalidator.as_ref(),
            &ViewPath::after_saved_listings_changed(),
        )
        .await;

        Ok(saved)
    }

    /// Lists the caller's saved listings with the listings they point at.
    ///
    /// Records whose listing is no longer visible are left out.
    pub async fn list_saved_listings(
        &self,
        context: &RequestContext,
    ) -> AppResult<Vec<SavedListingEntry>> {
        let caller = context.require_auth("view saved listings")?;
        let saved = self.saved_listings.list_for_user(caller.user_id()).await?;

        let listing_ids: Vec<_> = saved.iter().map(|record| record.listing_id).collect();
        let mut listings: HashMap<_, _> = self
            .listings
            .find_many(&listing_ids)
            .await?
            .into_iter()
            .filter(|listing| {
                listing.approved || caller.is_admin() || listing.is_owned_by(caller.user_id())
            })
            .map(|listing| (listing.id, listing))
            .collect();

        Ok(saved
            .into_iter()
            .filter_map(|record| {
                listings
                    .remove(&record.listing_id)
                    .map(|listing| SavedListingEntry {
                        saved: record,
                        listing,
                    })
            })
            .collect())
    }
}

fn saved_listing_not_owned(verb: &str) -> AppError {
    AppError::NotFound(format!(
        "Saved listing not found or you do not have permission to {verb} it"
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use rentline_core::AppError;
    use rentline_domain::{ListingId, Role, SaveOutcome};

    use crate::test_support::{
        FakeListingRepository, FakeSavedListingRepository, RecordingViewInvalidator, context_for,
        listing_form_values,
    };
    use crate::{ListingService, RequestContext};

    use super::SavedListingService;

    struct Fixture {
        service: SavedListingService,
        listing_service: ListingService,
        saved: Arc<FakeSavedListingRepository>,
    }

    fn fixture() -> Fixture {
        let listings = Arc::new(FakeListingRepository::default());
        let saved = Arc::new(FakeSavedListingRepository::default());
        let invalidator = Arc::new(RecordingViewInvalidator::default());

        Fixture {
            service: SavedListingService::new(saved.clone(), listings.clone(), invalidator.clone()),
            listing_service: ListingService::new(listings, invalidator),
            saved,
        }
    }

    async fn published_listing(fixture: &Fixture) -> ListingId {
        let (admin, _) = context_for(Role::Admin);
        fixture
            .listing_service
            .create_listing(&admin, listing_form_values().into())
            .await
            .map(|listing| listing.id)
            .unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn resaving_updates_notes_in_place() {
        let fixture = fixture();
        let listing_id = published_listing(&fixture).await;
        let (user, _) = context_for(Role::User);

        let first = fixture
            .service
            .save_listing(
                &user,
                json!({"listing_id": listing_id.to_string(), "notes": "call landlord"}).into(),
            )
            .await
            .unwrap_or_else(|_| unreachable!());
        let second = fixture
            .service
            .save_listing(
                &user,
                json!({"listing_id": listing_id.to_string(), "notes": "viewing on Friday"}).into(),
            )
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(first.outcome, SaveOutcome::Created);
        assert_eq!(second.outcome, SaveOutcome::Updated);
        assert_eq!(first.saved.id, second.saved.id);
        assert_eq!(second.saved.notes.as_deref(), Some("viewing on Friday"));
        assert_eq!(fixture.saved.saved.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn resaving_without_notes_keeps_stored_notes() {
        let fixture = fixture();
        let listing_id = published_listing(&fixture).await;
        let (user, _) = context_for(Role::User);

        fixture
            .service
            .save_listing(
                &user,
                json!({"listing_id": listing_id.to_string(), "notes": "call landlord"}).into(),
            )
            .await
            .unwrap_or_else(|_| unreachable!());
        let resaved = fixture
            .service
            .save_listing(&user, json!({"listing_id": listing_id.to_string()}).into())
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(resaved.outcome, SaveOutcome::Updated);
        assert_eq!(resaved.saved.notes.as_deref(), Some("call landlord"));
        assert_eq!(
            fixture
                .saved
                .saved
                .lock()
                .await
                .first()
                .and_then(|record| record.notes.clone())
                .as_deref(),
            Some("call landlord")
        );
    }

    #[tokio::test]
    async fn saving_unknown_listing_is_not_found() {
        let fixture = fixture();
        let (user, _) = context_for(Role::User);

        let result = fixture
            .service
            .save_listing(
                &user,
                json!({"listing_id": ListingId::new().to_string()}).into(),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(fixture.saved.saved.lock().await.is_empty());
    }

    #[tokio::test]
    async fn saving_requires_a_session() {
        let fixture = fixture();
        let listing_id = published_listing(&fixture).await;

        let result = fixture
            .service
            .save_listing(
                &RequestContext::anonymous(),
                json!({"listing_id": listing_id.to_string()}).into(),
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::Unauthenticated(message))
                if message == "You must be logged in to save a listing"
        ));
    }

    #[tokio::test]
    async fn removing_another_users_save_fails_like_a_missing_one() {
        let fixture = fixture();
        let listing_id = published_listing(&fixture).await;
        let (owner, _) = context_for(Role::User);
        let (other, _) = context_for(Role::User);
        let saved = fixture
            .service
            .save_listing(&owner, json!({"listing_id": listing_id.to_string()}).into())
            .await
            .unwrap_or_else(|_| unreachable!());

        let by_other = fixture
            .service
            .remove_saved_listing(&other, json!({"id": saved.saved.id.to_string()}).into())
            .await;
        let missing = fixture
            .service
            .remove_saved_listing(
                &owner,
                json!({"id": ListingId::new().to_string()}).into(),
            )
            .await;

        for result in [by_other, missing] {
            assert!(matches!(
                result,
                Err(AppError::NotFound(message))
                    if message == "Saved listing not found or you do not have permission to delete it"
            ));
        }
        assert_eq!(fixture.saved.saved.lock().await.len(), 1);

        let removed = fixture
            .service
            .remove_saved_listing(&owner, json!({"id": saved.saved.id.to_string()}).into())
            .await;
        assert!(matches!(removed, Ok(id) if id == saved.saved.id));
        assert!(fixture.saved.saved.lock().await.is_empty());
    }

    #[tokio::test]
    async fn remove_requires_uuid() {
        let fixture = fixture();
        let (user, _) = context_for(Role::User);

        let result = fixture
            .service
            .remove_saved_listing(&user, json!({"id": "7"}).into())
            .await;

        let Err(AppError::InvalidFields(errors)) = result else {
            unreachable!("expected field errors");
        };
        assert_eq!(errors.get("id"), Some(["Invalid uuid".to_owned()].as_slice()));
    }

    #[tokio::test]
    async fn notes_update_and_listing_are_owner_scoped() {
        let fixture = fixture();
        let listing_id = published_listing(&fixture).await;
        let (owner, _) = context_for(Role::User);
        let (other, _) = context_for(Role::User);
        let saved = fixture
            .service
            .save_listing(&owner, json!({"listing_id": listing_id.to_string()}).into())
            .await
            .unwrap_or_else(|_| unreachable!());

        let updated = fixture
            .service
            .update_saved_listing_notes(
                &owner,
                json!({"id": saved.saved.id.to_string(), "notes": "ask about parking"}).into(),
            )
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(updated.notes.as_deref(), Some("ask about parking"));

        let by_other = fixture
            .service
            .update_saved_listing_notes(
                &other,
                json!({"id": saved.saved.id.to_string(), "notes": "mine now"}).into(),
            )
            .await;
        assert!(matches!(by_other, Err(AppError::NotFound(_))));

        let entries = fixture
            .service
            .list_saved_listings(&owner)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.first().map(|entry| entry.listing.id), Some(listing_id));
        assert!(
            fixture
                .service
                .list_saved_listings(&other)
                .await
                .is_ok_and(|entries| entries.is_empty())
        );
    }
}
