use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rentline_application::ProfileRepository;
use rentline_core::{AppResult, UserId};
use rentline_domain::{Profile, ProfileUpdate};
use tokio::sync::RwLock;

/// In-memory profile repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<UserId, Profile>>,
}

impl InMemoryProfileRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a profile as is, replacing any existing one. Used to seed roles.
    pub async fn put(&self, profile: Profile) {
        self.profiles.write().await.insert(profile.id, profile);
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn insert_if_missing(&self, profile: Profile) -> AppResult<Profile> {
        Ok(self
            .profiles
            .write()
            .await
            .entry(profile.id)
            .or_insert(profile)
            .clone())
    }

    async fn update(&self, user_id: UserId, update: ProfileUpdate) -> AppResult<Option<Profile>> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.get_mut(&user_id).map(|profile| {
            profile.apply(update, Utc::now());
            profile.clone()
        }))
    }
}
