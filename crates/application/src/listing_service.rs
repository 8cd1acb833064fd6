//! Listing mutation actions and reads.

use std::sync::Arc;

use tracing::{info, warn};

use rentline_core::{AppError, AppResult};
use rentline_domain::schemas::{APPROVE_LISTING, CREATE_LISTING, UPDATE_LISTING};
use rentline_domain::{
    ApprovalDecision, Listing, ListingChanges, ListingDraft, ListingFilter, ListingId,
    ListingPage, NewListing, PageRequest, Role, ViewPath,
};

use crate::view_invalidation::invalidate_views;
use crate::{ActionInput, ListingRepository, RequestContext, ViewInvalidator, validate_action_input};


/// Roles allowed to publish listings.
const PUBLISHER_ROLES: &[Role] = &[Role::Agent, Role::Admin];

/// Public index query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    /// Exact property type.
    pub property_type: Option<String>,
    /// Minimum bedroom count.
    pub min_bedrooms: Option<i32>,
    /// Maximum monthly rent.
    pub max_price: Option<f64>,
    /// Only featured listings.
    pub featured_only: bool,
}

/// Application service for listings.
#[derive(Clone)]
pub struct ListingService {
    repository: Arc<dyn ListingRepository>,
    view_invalidator: Arc<dyn ViewInvalidator>,
}

impl ListingService {
    /// Creates a new listing service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn ListingRepository>,
        view_invalidator: Arc<dyn ViewInvalidator>,
    ) -> Self {
        Self {
            repository,
            view_invalidator,
        }
    }

    /// Creates a listing owned by the caller. Admin listings start approved.
    pub async fn create_listing(
        &self,
        context: &RequestContext,
        input: ActionInput,
    ) -> AppResult<Listing> {
        let caller = context.require_role(
            "create a listing",
            PUBLISHER_ROLES,
            "Only agents and admins can create listings",
        )?;

        let draft: ListingDraft = validate_action_input(&CREATE_LISTING, input)?;
        let listing = self
            .repository
            .insert(NewListing {
                owner_id: caller.user_id(),
                approved: caller.is_admin(),
                draft,
            })
            .await
            .map_err(|error| remote_failure("Failed to create listing", error))?;

        info!(
            listing_id = %listing.id,
            user_id = %caller.user_id(),
            approved = listing.approved,
            "listing created"
        );
        invalidate_views(
            self.view_invalidator.as_ref(),
            &ViewPath::after_listing_created(),
        )
        .await;

        Ok(listing)
    }

    /// Updates a listing owned by the caller, or any listing for admins.
    ///
    /// Moderation flags sent by non-admins are dropped, not rejected.
    pub async fn update_listing(
        &self,
        context: &RequestContext,
        id: ListingId,
        input: ActionInput,
    ) -> AppResult<Listing> {
        let caller = context.require_auth("update a listing")?;
        let existing = self.find_existing(id).await?;
        if !caller.is_admin() && !existing.is_owned_by(caller.user_id()) {
            return Err(AppError::Forbidden(
                "You do not have permission to update this listing".to_owned(),
            ));
        }

        let mut changes: ListingChanges = validate_action_input(&UPDATE_LISTING, input)?;
        if !caller.is_admin() {
            let dropped = changes.strip_privileged();
            if !dropped.is_empty() {
                warn!(
                    listing_id = %id,
                    user_id = %caller.user_id(),
                    fields = ?dropped,
                    "dropped moderation fields from non-admin update"
                );
            }
        }

        let listing = if changes.is_empty() {
            existing
        } else {
            self.repository
                .update(id, changes)
                .await
                .map_err(|error| remote_failure("Failed to update listing", error))?
                .ok_or_else(listing_not_found)?
        };

        info!(listing_id = %id, user_id = %caller.user_id(), "listing updated");
        invalidate_views(
            self.view_invalidator.as_ref(),
            &ViewPath::after_listing_changed(id),
        )
        .await;

        Ok(listing)
    }

    /// Deletes a listing owned by the caller, or any listing for admins.
    pub async fn delete_listing(
        &self,
        context: &RequestContext,
        id: ListingId,
    ) -> AppResult<ListingId> {
        let caller = context.require_auth("delete a listing")?;
        let existing = self.find_existing(id).await?;
        if !caller.is_admin() && !existing.is_owned_by(caller.user_id()) {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this listing".to_owned(),
            ));
        }

        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(|error| remote_failure("Failed to delete listing", error))?;
        if !deleted {
            return Err(listing_not_found());
        }

        info!(listing_id = %id, user_id = %caller.user_id(), "listing deleted");
        invalidate_views(
            self.view_invalidator.as_ref(),
            &ViewPath::after_listing_deleted(id),
        )
        .await;

        Ok(id)
    }

    /// Sets approval and featured flags. Admin only; an omitted featured flag clears it.
    pub async fn approve_listing(
        &self,
        context: &RequestContext,
        input: ActionInput,
    ) -> AppResult<Listing> {
        let caller = context.require_role(
            "approve listings",
            &[Role::Admin],
            "Only admins can approve listings",
        )?;

        let decision: ApprovalDecision = validate_action_input(&APPROVE_LISTING, input)?;
        let listing = self
            .repository
            .set_moderation(decision.id, decision.approved, decision.featured())
            .await
            .map_err(|error| remote_failure("Failed to update listing", error))?
            .ok_or_else(listing_not_found)?;

        info!(
            listing_id = %listing.id,
            user_id = %caller.user_id(),
            approved = listing.approved,
            featured = listing.featured,
            "listing moderated"
        );
        invalidate_views(
            self.view_invalidator.as_ref(),
            &ViewPath::after_listing_changed(listing.id),
        )
        .await;

        Ok(listing)
    }

    /// Returns one listing. Unapproved listings are visible to their owner and admins only.
    pub async fn get_listing(&self, context: &RequestContext, id: ListingId) -> AppResult<Listing> {
        let listing = self.find_existing(id).await?;
        if listing.approved {
            return Ok(listing);
        }

        let visible = context
            .current_user()
            .is_some_and(|caller| caller.is_admin() || listing.is_owned_by(caller.user_id()));
        if visible {
            Ok(listing)
        } else {
            Err(listing_not_found())
        }
    }

    /// Lists approved listings for the public index.
    pub async fn list_listings(
        &self,
        query: ListingQuery,
        page: PageRequest,
    ) -> AppResult<ListingPage> {
        let filter = ListingFilter {
            property_type: query.property_type,
            min_bedrooms: query.min_bedrooms,
            max_price: query.max_price,
            featured_only: query.featured_only,
            ..ListingFilter::public()
        };

        self.repository.list(&filter, page).await
    }

    /// Lists the caller's own listings, approved or not.
    pub async fn list_my_listings(
        &self,
        context: &RequestContext,
        page: PageRequest,
    ) -> AppResult<ListingPage> {
        let caller = context.require_role(
            "view your listings",
            PUBLISHER_ROLES,
            "Only agents and admins can manage listings",
        )?;

        self.repository
            .list(&ListingFilter::owned_by(caller.user_id()), page)
            .await
    }

    /// Lists every listing, including those awaiting approval. Admin only.
    pub async fn list_all_listings(
        &self,
        context: &RequestContext,
        page: PageRequest,
    ) -> AppResult<ListingPage> {
        context.require_role(
            "moderate listings",
            &[Role::Admin],
            "Only admins can moderate listings",
        )?;

        self.repository.list(&ListingFilter::default(), page).await
    }

    /// Lists property types present among approved listings.
    pub async fn list_property_types(&self) -> AppResult<Vec<String>> {
        self.repository.list_property_types().await
    }

    async fn find_existing(&self, id: ListingId) -> AppResult<Listing> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(listing_not_found)
    }
}

fn listing_not_found() -> AppError {
    AppError::NotFound("Listing not found".to_owned())
}

/// Prefixes remote store failures with the action that hit them.
pub(crate) fn remote_failure(context: &str, error: AppError) -> AppError {
    match error {
        AppError::Remote(message) => AppError::Remote(format!("{context}: {message}")),
        other => other,
    }
}
