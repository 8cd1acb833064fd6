use rentline_application::ListingQuery;
use rentline_domain::{Listing, ListingPage, PageRequest};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/listing-response.ts"
)]
pub struct ListingResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub neighborhood: Option<String>,
    pub price: f64,
    pub property_type: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<f64>,
    pub square_footage: Option<i32>,
    pub parking: bool,
    pub parking_fee: i64,
    pub pet_friendly: bool,
    pub pet_deposit: i64,
    pub utilities: Vec<String>,
    pub utilities_cost: i64,
    pub security_deposit: Option<i64>,
    pub minimum_lease: Option<i32>,
    pub available_date: Option<String>,
    pub application_fee: Option<i64>,
    pub amenities: Vec<String>,
    pub image_urls: Vec<String>,
    pub property_manager: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub nearby_transportation: Vec<String>,
    pub approved: bool,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        let details = listing.details;
        Self {
            id: listing.id.to_string(),
            owner_id: listing.owner_id.to_string(),
            title: details.title,
            description: details.description,
            address: details.address,
            city: details.city,
            state: details.state,
            zip_code: details.zip_code,
            neighborhood: details.neighborhood,
            price: details.price,
            property_type: details.property_type,
            bedrooms: details.bedrooms,
            bathrooms: details.bathrooms,
            square_footage: details.square_footage,
            parking: details.parking,
            parking_fee: details.parking_fee,
            pet_friendly: details.pet_friendly,
            pet_deposit: details.pet_deposit,
            utilities: details.utilities,
            utilities_cost: details.utilities_cost,
            security_deposit: details.security_deposit,
            minimum_lease: details.minimum_lease,
            available_date: details.available_date,
            application_fee: details.application_fee,
            amenities: details.amenities,
            image_urls: details.image_urls,
            property_manager: details.property_manager,
            contact_phone: details.contact_phone,
            contact_email: details.contact_email,
            latitude: details.latitude,
            longitude: details.longitude,
            nearby_transportation: details.nearby_transportation,
            approved: listing.approved,
            featured: listing.featured,
            created_at: listing.created_at.to_rfc3339(),
            updated_at: listing.updated_at.to_rfc3339(),
        }
    }
}

/// One page of listings.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/listing-page-response.ts"
)]
pub struct ListingPageResponse {
    pub listings: Vec<ListingResponse>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

impl ListingPageResponse {
    pub fn new(page: ListingPage, window: PageRequest) -> Self {
        Self {
            listings: page.listings.into_iter().map(ListingResponse::from).collect(),
            total: page.total,
            limit: window.limit(),
            offset: window.offset(),
        }
    }
}

/// Identifier of a deleted listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/deleted-listing-response.ts"
)]
pub struct DeletedListingResponse {
    pub id: String,
}

/// Pagination query shared by listing reads.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// One-based page number; takes precedence over `offset`.
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn window(&self) -> PageRequest {
        match self.page {
            Some(page) => PageRequest::for_page(page, self.limit),
            None => PageRequest::new(self.limit, self.offset),
        }
    }
}

/// Query string of the public listing index.
#[derive(Debug, Default, Deserialize)]
pub struct ListingIndexQuery {
    pub property_type: Option<String>,
    pub min_bedrooms: Option<i32>,
    pub max_price: Option<f64>,
    #[serde(default)]
    pub featured_only: bool,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub page: Option<u32>,
}

impl ListingIndexQuery {
    pub fn window(&self) -> PageRequest {
        PageQuery {
            limit: self.limit,
            offset: self.offset,
            page: self.page,
        }
        .window()
    }

    pub fn filter(&self) -> ListingQuery {
        ListingQuery {
            property_type: self
                .property_type
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
            min_bedrooms: self.min_bedrooms,
            max_price: self.max_price,
            featured_only: self.featured_only,
        }
    }
}
