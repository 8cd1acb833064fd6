use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rentline_application::ProfileRepository;
use rentline_core::{AppError, AppResult, UserId};
use rentline_domain::{Profile, ProfileUpdate, Role};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::postgres_errors::store_failure;

/// PostgreSQL-backed profile repository.
#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    full_name: Option<String>,
    avatar_url: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            role: Role::from_str(row.role.as_str())
                .map_err(|error| AppError::Internal(format!("invalid stored role: {error}")))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, full_name, avatar_url, role, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_failure("find profile", error))?;

        row.map(Profile::try_from).transpose()
    }

    async fn insert_if_missing(&self, profile: Profile) -> AppResult<Profile> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (id, full_name, avatar_url, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (id) DO UPDATE SET id = profiles.id
            RETURNING id, full_name, avatar_url, role, created_at, updated_at
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(profile.full_name)
        .bind(profile.avatar_url)
        .bind(profile.role.as_str())
        .bind(profile.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| store_failure("create profile", error))?;

        Profile::try_from(row)
    }

    async fn update(&self, user_id: UserId, update: ProfileUpdate) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles
            SET full_name = $2, avatar_url = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, full_name, avatar_url, role, created_at, updated_at
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(update.full_name)
        .bind(update.avatar_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_failure("update profile", error))?;

        row.map(Profile::try_from).transpose()
    }
}
