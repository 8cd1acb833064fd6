use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rentline_application::SavedListingRepository;
use rentline_core::{AppResult, UserId};
use rentline_domain::{ListingId, SaveOutcome, SavedListing, SavedListingId};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::postgres_errors::store_failure;

/// PostgreSQL-backed saved listing repository.
#[derive(Clone)]
pub struct PostgresSavedListingRepository {
    pool: PgPool,
}

impl PostgresSavedListingRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SavedListingRow {
    id: Uuid,
    user_id: Uuid,
    listing_id: Uuid,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct UpsertedRow {
    #[sqlx(flatten)]
    saved: SavedListingRow,
    inserted: bool,
}

impl From<SavedListingRow> for SavedListing {
    fn from(row: SavedListingRow) -> Self {
        Self {
            id: SavedListingId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            listing_id: ListingId::from_uuid(row.listing_id),
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SavedListingRepository for PostgresSavedListingRepository {
    async fn upsert(
        &self,
        user_id: UserId,
        listing_id: ListingId,
        notes: Option<String>,
    ) -> AppResult<(SavedListing, SaveOutcome)> {
        // xmax is zero only for a freshly inserted tuple.
        let row = sqlx::query_as::<_, UpsertedRow>(
            r#"
            INSERT INTO saved_listings (id, user_id, listing_id, notes)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, listing_id)
            DO UPDATE SET notes = COALESCE(EXCLUDED.notes, saved_listings.notes)
            RETURNING id, user_id, listing_id, notes, created_at, (xmax = 0) AS inserted
            "#,
        )
        .bind(SavedListingId::new().as_uuid())
        .bind(user_id.as_uuid())
        .bind(listing_id.as_uuid())
        .bind(notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| store_failure("save listing", error))?;

        let outcome = if row.inserted {
            SaveOutcome::Created
        } else {
            SaveOutcome::Updated
        };

        Ok((row.saved.into(), outcome))
    }

    async fn update_notes(
        &self,
        id: SavedListingId,
        user_id: UserId,
        notes: Option<String>,
    ) -> AppResult<Option<SavedListing>> {
        let row = sqlx::query_as::<_, SavedListingRow>(
            r#"
            UPDATE saved_listings
            SET notes = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, listing_id, notes, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_failure("update saved listing notes", error))?;

        Ok(row.map(SavedListing::from))
    }

    async fn delete_for_user(&self, id: SavedListingId, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM saved_listings WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| store_failure("delete saved listing", error))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<SavedListing>> {
        let rows = sqlx::query_as::<_, SavedListingRow>(
            r#"
            SELECT id, user_id, listing_id, notes, created_at
            FROM saved_listings
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_failure("list saved listings", error))?;

        Ok(rows.into_iter().map(SavedListing::from).collect())
    }
}
