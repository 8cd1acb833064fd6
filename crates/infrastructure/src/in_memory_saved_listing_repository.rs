use async_trait::async_trait;
use chrono::Utc;
use rentline_application::SavedListingRepository;
use rentline_core::{AppResult, UserId};
use rentline_domain::{ListingId, SaveOutcome, SavedListing, SavedListingId};
use tokio::sync::RwLock;

/// In-memory saved listing repository implementation.
///
/// The write lock makes the upsert atomic per (user, listing) pair.
#[derive(Debug, Default)]
pub struct InMemorySavedListingRepository {
    records: RwLock<Vec<SavedListing>>,
}

impl InMemorySavedListingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedListingRepository for InMemorySavedListingRepository {
    async fn upsert(
        &self,
        user_id: UserId,
        listing_id: ListingId,
        notes: Option<String>,
    ) -> AppResult<(SavedListing, SaveOutcome)> {
        let mut records = self.records.write().await;
        if let Some(existing) = records
            .iter_mut()
            .find(|record| record.user_id == user_id && record.listing_id == listing_id)
        {
            if notes.is_some() {
                existing.notes = notes;
            }
            return Ok((existing.clone(), SaveOutcome::Updated));
        }

        let record = SavedListing {
            id: SavedListingId::new(),
            user_id,
            listing_id,
            notes,
            created_at: Utc::now(),
        };
        records.push(record.clone());

        Ok((record, SaveOutcome::Created))
    }

    async fn update_notes(
        &self,
        id: SavedListingId,
        user_id: UserId,
        notes: Option<String>,
    ) -> AppResult<Option<SavedListing>> {
        let mut records = self.records.write().await;
        Ok(records
            .iter_mut()
            .find(|record| record.id == id && record.user_id == user_id)
            .map(|record| {
                record.notes = notes;
                record.clone()
            }))
    }

    async fn delete_for_user(&self, id: SavedListingId, user_id: UserId) -> AppResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| !(record.id == id && record.user_id == user_id));

        Ok(records.len() < before)
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<SavedListing>> {
        let mut saved: Vec<SavedListing> = self
            .records
            .read()
            .await
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        saved.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rentline_application::SavedListingRepository;
    use rentline_core::UserId;
    use rentline_domain::{ListingId, SaveOutcome};

    use super::InMemorySavedListingRepository;

    #[tokio::test]
    async fn parallel_saves_keep_one_record() {
        let repository = Arc::new(InMemorySavedListingRepository::new());
        let user_id = UserId::new();
        let listing_id = ListingId::new();

        let handles: Vec<_> = (0..8)
            .map(|index| {
                let repository = repository.clone();
                tokio::spawn(async move {
                    repository
                        .upsert(user_id, listing_id, Some(format!("note {index}")))
                        .await
                        .map(|(_, outcome)| outcome)
                        .ok()
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.ok().flatten() == Some(SaveOutcome::Created) {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(
            repository
                .list_for_user(user_id)
                .await
                .unwrap_or_default()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn upsert_without_notes_keeps_existing_notes() {
        let repository = InMemorySavedListingRepository::new();
        let user_id = UserId::new();
        let listing_id = ListingId::new();

        let first = repository
            .upsert(user_id, listing_id, Some("south facing".to_owned()))
            .await;
        let second = repository.upsert(user_id, listing_id, None).await;

        assert!(matches!(first, Ok((_, SaveOutcome::Created))));
        assert!(matches!(
            second,
            Ok((saved, SaveOutcome::Updated)) if saved.notes.as_deref() == Some("south facing")
        ));
    }
}
