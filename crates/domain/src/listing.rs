use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rentline_core::{AppError, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of listings on one index page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Identifier of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    /// Creates a random listing identifier.
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

impl Default for ListingId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ListingId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| AppError::Validation("Invalid listing ID".to_owned()))
    }
}

/// Publisher-editable listing content, as accepted by the create schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    /// Headline shown on cards and detail pages.
    pub title: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code, kept as text.
    pub zip_code: String,
    /// Neighborhood name.
    pub neighborhood: Option<String>,
    /// Monthly rent.
    pub price: f64,
    /// Property type such as `apartment` or `house`.
    pub property_type: String,
    /// Bedroom count.
    pub bedrooms: Option<i32>,
    /// Bathroom count; halves allowed.
    pub bathrooms: Option<f64>,
    /// Interior area in square feet.
    pub square_footage: Option<i32>,
    /// Whether parking is available.
    #[serde(default)]
    pub parking: bool,
    /// Monthly parking fee.
    #[serde(default)]
    pub parking_fee: i64,
    /// Whether pets are allowed.
    #[serde(default)]
    pub pet_friendly: bool,
    /// Pet deposit.
    #[serde(default)]
    pub pet_deposit: i64,
    /// Utilities included in the rent.
    #[serde(default)]
    pub utilities: Vec<String>,
    /// Monthly utilities cost.
    #[serde(default)]
    pub utilities_cost: i64,
    /// Security deposit.
    pub security_deposit: Option<i64>,
    /// Minimum lease length in months.
    pub minimum_lease: Option<i32>,
    /// Move-in date as entered by the publisher.
    pub available_date: Option<String>,
    /// Application fee.
    pub application_fee: Option<i64>,
    /// Amenities.
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Public URLs of uploaded photos, in display order.
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Managing company or person.
    pub property_manager: Option<String>,
    /// Contact phone number.
    pub contact_phone: Option<String>,
    /// Contact email address.
    pub contact_email: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Nearby transit lines or stations.
    #[serde(default)]
    pub nearby_transportation: Vec<String>,
}

/// Listing content ready for insertion, with ownership and initial moderation state.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    /// Publisher who owns the listing from now on.
    pub owner_id: UserId,
    /// Initial approval; true only for admin publishers.
    pub approved: bool,
    /// Validated content.
    pub draft: ListingDraft,
}

/// A stored rental listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Listing identifier.
    pub id: ListingId,
    /// Owning publisher. Immutable after creation.
    pub owner_id: UserId,
    /// Publisher-editable content.
    #[serde(flatten)]
    pub details: ListingDraft,
    /// Visible on the public index.
    pub approved: bool,
    /// Highlighted on the home page.
    pub featured: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Builds the stored form of a new listing. Listings start unfeatured.
    #[must_use]
    pub fn create(id: ListingId, listing: NewListing, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: listing.owner_id,
            details: listing.draft,
            approved: listing.approved,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns whether the user may edit or delete this listing.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Applies a partial update. Ownership is never touched.
    pub fn apply(&mut self, changes: ListingChanges, now: DateTime<Utc>) {
        let details = &mut self.details;
        macro_rules! assign {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = changes.$field {
                        details.$field = value;
                    }
                )*
            };
        }
        macro_rules! assign_optional {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = changes.$field {
                        details.$field = Some(value);
                    }
                )*
            };
        }

        assign!(
            title,
            address,
            city,
            state,
            zip_code,
            price,
            property_type,
            parking,
            parking_fee,
            pet_friendly,
            pet_deposit,
            utilities,
            utilities_cost,
            amenities,
            image_urls,
            nearby_transportation,
        );
        assign_optional!(
            description,
            neighborhood,
            bedrooms,
            bathrooms,
            square_footage,
            security_deposit,
            minimum_lease,
            available_date,
            application_fee,
            property_manager,
            contact_phone,
            contact_email,
            latitude,
            longitude,
        );

        if let Some(approved) = changes.approved {
            self.approved = approved;
        }
        if let Some(featured) = changes.featured {
            self.featured = featured;
        }
        self.updated_at = now;
    }
}

/// Partial listing update as accepted by the update schema.
///
/// Fields mirror [`ListingDraft`] plus the moderation flags. Absent and `null`
/// fields both mean "leave unchanged".
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub neighborhood: Option<String>,
    pub price: Option<f64>,
    pub property_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<f64>,
    pub square_footage: Option<i32>,
    pub parking: Option<bool>,
    pub parking_fee: Option<i64>,
    pub pet_friendly: Option<bool>,
    pub pet_deposit: Option<i64>,
    pub utilities: Option<Vec<String>>,
    pub utilities_cost: Option<i64>,
    pub security_deposit: Option<i64>,
    pub minimum_lease: Option<i32>,
    pub available_date: Option<String>,
    pub application_fee: Option<i64>,
    pub amenities: Option<Vec<String>>,
    pub image_urls: Option<Vec<String>>,
    pub property_manager: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub nearby_transportation: Option<Vec<String>>,
    pub approved: Option<bool>,
    pub featured: Option<bool>,
}

impl ListingChanges {
    /// Removes the moderation flags. Returns the names of the flags that were set.
    pub fn strip_privileged(&mut self) -> Vec<&'static str> {
        let mut dropped = Vec::new();
        if self.approved.take().is_some() {
            dropped.push("approved");
        }
        if self.featured.take().is_some() {
            dropped.push("featured");
        }

        dropped
    }

    /// Returns whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Moderation decision made by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ApprovalDecision {
    /// Listing to moderate.
    pub id: ListingId,
    /// New approval state.
    pub approved: bool,
    /// New featured state.
    pub featured: Option<bool>,
}

impl ApprovalDecision {
    /// Returns the featured flag to store. An omitted flag clears it.
    #[must_use]
    pub fn featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }
}

/// Filter for listing queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    /// Exclude listings awaiting approval.
    pub approved_only: bool,
    /// Only featured listings.
    pub featured_only: bool,
    /// Only listings owned by this user.
    pub owner_id: Option<UserId>,
    /// Exact property type.
    pub property_type: Option<String>,
    /// Minimum bedroom count; listings without a count never match.
    pub min_bedrooms: Option<i32>,
    /// Maximum monthly rent, inclusive.
    pub max_price: Option<f64>,
}

impl ListingFilter {
    /// Filter used by the public index: approved listings only.
    #[must_use]
    pub fn public() -> Self {
        Self {
            approved_only: true,
            ..Self::default()
        }
    }

    /// Filter for one publisher's own listings, approved or not.
    #[must_use]
    pub fn owned_by(owner_id: UserId) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    /// Returns whether a listing passes every set criterion.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        if self.approved_only && !listing.approved {
            return false;
        }
        if self.featured_only && !listing.featured {
            return false;
        }
        if self
            .owner_id
            .is_some_and(|owner_id| owner_id != listing.owner_id)
        {
            return false;
        }
        if self
            .property_type
            .as_deref()
            .is_some_and(|property_type| property_type != listing.details.property_type)
        {
            return false;
        }
        if let Some(min_bedrooms) = self.min_bedrooms
            && listing
                .details
                .bedrooms
                .is_none_or(|bedrooms| bedrooms < min_bedrooms)
        {
            return false;
        }
        if let Some(max_price) = self.max_price
            && listing.details.price > max_price
        {
            return false;
        }

        true
    }
}

/// Limit/offset window over an ordered listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    offset: u32,
}

impl PageRequest {
    /// Creates a window, clamping the limit into `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0),
        }
    }

    /// Creates the window for a one-based page number.
    #[must_use]
    pub fn for_page(page: u32, limit: Option<u32>) -> Self {
        let window = Self::new(limit, None);
        Self {
            offset: page.saturating_sub(1).saturating_mul(window.limit),
            ..window
        }
    }

    /// Returns the page size.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of listings and the size of the full result set.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    /// Listings in the requested window, newest first.
    pub listings: Vec<Listing>,
    /// Number of listings matching the filter.
    pub total: u64,
}
