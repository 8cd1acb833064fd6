use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rentline_application::ListingRepository;
use rentline_core::{AppError, AppResult, UserId};
use rentline_domain::{
    Listing, ListingChanges, ListingDraft, ListingFilter, ListingId, ListingPage, NewListing,
    PageRequest,
};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::postgres_errors::store_failure;

#[cfg(test)]
mod tests;

const LISTING_COLUMNS: &str = "id, owner_id, title, description, address, city, state, zip_code, \
    neighborhood, price, property_type, bedrooms, bathrooms, square_footage, parking, parking_fee, \
    pet_friendly, pet_deposit, utilities, utilities_cost, security_deposit, minimum_lease, \
    available_date, application_fee, amenities, image_urls, property_manager, contact_phone, \
    contact_email, latitude, longitude, nearby_transportation, approved, featured, created_at, \
    updated_at";

/// PostgreSQL-backed listing repository.
#[derive(Clone)]
pub struct PostgresListingRepository {
    pool: PgPool,
}

impl PostgresListingRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ListingRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: Option<String>,
    address: String,
    city: String,
    state: String,
    zip_code: String,
    neighborhood: Option<String>,
    price: f64,
    property_type: String,
    bedrooms: Option<i32>,
    bathrooms: Option<f64>,
    square_footage: Option<i32>,
    parking: bool,
    parking_fee: i64,
    pet_friendly: bool,
    pet_deposit: i64,
    utilities: Vec<String>,
    utilities_cost: i64,
    security_deposit: Option<i64>,
    minimum_lease: Option<i32>,
    available_date: Option<String>,
    application_fee: Option<i64>,
    amenities: Vec<String>,
    image_urls: Vec<String>,
    property_manager: Option<String>,
    contact_phone: Option<String>,
    contact_email: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    nearby_transportation: Vec<String>,
    approved: bool,
    featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Self {
            id: ListingId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            details: ListingDraft {
                title: row.title,
                description: row.description,
                address: row.address,
                city: row.city,
                state: row.state,
                zip_code: row.zip_code,
                neighborhood: row.neighborhood,
                price: row.price,
                property_type: row.property_type,
                bedrooms: row.bedrooms,
                bathrooms: row.bathrooms,
                square_footage: row.square_footage,
                parking: row.parking,
                parking_fee: row.parking_fee,
                pet_friendly: row.pet_friendly,
                pet_deposit: row.pet_deposit,
                utilities: row.utilities,
                utilities_cost: row.utilities_cost,
                security_deposit: row.security_deposit,
                minimum_lease: row.minimum_lease,
                available_date: row.available_date,
                application_fee: row.application_fee,
                amenities: row.amenities,
                image_urls: row.image_urls,
                property_manager: row.property_manager,
                contact_phone: row.contact_phone,
                contact_email: row.contact_email,
                latitude: row.latitude,
                longitude: row.longitude,
                nearby_transportation: row.nearby_transportation,
            },
            approved: row.approved,
            featured: row.featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    async fn insert(&self, listing: NewListing) -> AppResult<Listing> {
        let NewListing {
            owner_id,
            approved,
            draft,
        } = listing;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO listings (id, owner_id, approved, title, description, address, city, \
             state, zip_code, neighborhood, price, property_type, bedrooms, bathrooms, \
             square_footage, parking, parking_fee, pet_friendly, pet_deposit, utilities, \
             utilities_cost, security_deposit, minimum_lease, available_date, application_fee, \
             amenities, image_urls, property_manager, contact_phone, contact_email, latitude, \
             longitude, nearby_transportation) VALUES (",
        );
        let mut values = builder.separated(", ");
        values.push_bind(ListingId::new().as_uuid());
        values.push_bind(owner_id.as_uuid());
        values.push_bind(approved);
        values.push_bind(draft.title);
        values.push_bind(draft.description);
        values.push_bind(draft.address);
        values.push_bind(draft.city);
        values.push_bind(draft.state);
        values.push_bind(draft.zip_code);
        values.push_bind(draft.neighborhood);
        values.push_bind(draft.price);
        values.push_bind(draft.property_type);
        values.push_bind(draft.bedrooms);
        values.push_bind(draft.bathrooms);
        values.push_bind(draft.square_footage);
        values.push_bind(draft.parking);
        values.push_bind(draft.parking_fee);
        values.push_bind(draft.pet_friendly);
        values.push_bind(draft.pet_deposit);
        values.push_bind(draft.utilities);
        values.push_bind(draft.utilities_cost);
        values.push_bind(draft.security_deposit);
        values.push_bind(draft.minimum_lease);
        values.push_bind(draft.available_date);
        values.push_bind(draft.application_fee);
        values.push_bind(draft.amenities);
        values.push_bind(draft.image_urls);
        values.push_bind(draft.property_manager);
        values.push_bind(draft.contact_phone);
        values.push_bind(draft.contact_email);
        values.push_bind(draft.latitude);
        values.push_bind(draft.longitude);
        values.push_bind(draft.nearby_transportation);
        builder.push(") RETURNING ");
        builder.push(LISTING_COLUMNS);

        let row = builder
            .build_query_as::<ListingRow>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| store_failure("insert listing", error))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: ListingId) -> AppResult<Option<Listing>> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_failure("find listing", error))?;

        Ok(row.map(Listing::from))
    }

    async fn find_many(&self, ids: &[ListingId]) -> AppResult<Vec<Listing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = ids.iter().map(ListingId::as_uuid).collect();
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_failure("load listings", error))?;

        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn update(&self, id: ListingId, changes: ListingChanges) -> AppResult<Option<Listing>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE listings SET updated_at = now()");

        macro_rules! push_assignments {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = changes.$field {
                        builder.push(concat!(", ", stringify!($field), " = "));
                        builder.push_bind(value);
                    }
                )*
            };
        }

        push_assignments!(
            title,
            description,
            address,
            city,
            state,
            zip_code,
            neighborhood,
            price,
            property_type,
            bedrooms,
            bathrooms,
            square_footage,
            parking,
            parking_fee,
            pet_friendly,
            pet_deposit,
            utilities,
            utilities_cost,
            security_deposit,
            minimum_lease,
            available_date,
            application_fee,
            amenities,
            image_urls,
            property_manager,
            contact_phone,
            contact_email,
            latitude,
            longitude,
            nearby_transportation,
            approved,
            featured,
        );

        builder.push(" WHERE id = ");
        builder.push_bind(id.as_uuid());
        builder.push(" RETURNING ");
        builder.push(LISTING_COLUMNS);

        let row = builder
            .build_query_as::<ListingRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| store_failure("update listing", error))?;

        Ok(row.map(Listing::from))
    }

    async fn set_moderation(
        &self,
        id: ListingId,
        approved: bool,
        featured: bool,
    ) -> AppResult<Option<Listing>> {
        let row = sqlx::query_as::<_, ListingRow>(&format!(
            r#"
            UPDATE listings
            SET approved = $2, featured = $3, updated_at = now()
            WHERE id = $1
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(approved)
        .bind(featured)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_failure("moderate listing", error))?;

        Ok(row.map(Listing::from))
    }

    async fn delete(&self, id: ListingId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| store_failure("delete listing", error))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &ListingFilter, page: PageRequest) -> AppResult<ListingPage> {
        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM listings");
        push_filter(&mut count_builder, filter);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| store_failure("count listings", error))?;

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {LISTING_COLUMNS} FROM listings"));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC, id LIMIT ");
        builder.push_bind(i64::from(page.limit()));
        builder.push(" OFFSET ");
        builder.push_bind(i64::from(page.offset()));

        let rows = builder
            .build_query_as::<ListingRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| store_failure("list listings", error))?;

        Ok(ListingPage {
            listings: rows.into_iter().map(Listing::from).collect(),
            total: u64::try_from(total)
                .map_err(|error| AppError::Internal(format!("invalid listing count: {error}")))?,
        })
    }

    async fn list_property_types(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT property_type
            FROM listings
            WHERE approved
            ORDER BY property_type
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_failure("list property types", error))
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListingFilter) {
    builder.push(" WHERE TRUE");

    if filter.approved_only {
        builder.push(" AND approved");
    }
    if filter.featured_only {
        builder.push(" AND featured");
    }
    if let Some(owner_id) = filter.owner_id {
        builder.push(" AND owner_id = ");
        builder.push_bind(owner_id.as_uuid());
    }
    if let Some(property_type) = &filter.property_type {
        builder.push(" AND property_type = ");
        builder.push_bind(property_type.clone());
    }
    if let Some(min_bedrooms) = filter.min_bedrooms {
        builder.push(" AND bedrooms >= ");
        builder.push_bind(min_bedrooms);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND price <= ");
        builder.push_bind(max_price);
    }
}
