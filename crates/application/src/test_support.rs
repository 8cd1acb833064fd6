use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use rentline_core::{AppError, AppResult, UserId, UserIdentity};
use rentline_domain::{
    ImageObjectPath, Listing, ListingChanges, ListingFilter, ListingId, ListingPage, NewListing,
    PageRequest, Profile, ProfileUpdate, Role, SaveOutcome, SavedListing, SavedListingId,
    ViewPath,
};

use crate::{
    Caller, ListingRepository, ObjectStore, ProfileRepository, RequestContext,
    SavedListingRepository, UploadOptions, ViewInvalidator,
};

pub(crate) fn context_for(role: Role) -> (RequestContext, UserId) {
    let user_id = UserId::new();
    let caller = Caller::new(UserIdentity::new(user_id, None), role);
    (RequestContext::authenticated(caller), user_id)
}

pub(crate) fn listing_form_values() -> Value {
    json!({
        "title": "Sunny loft",
        "address": "12 Harbor Street",
        "city": "Portland",
        "state": "OR",
        "zip_code": "97201",
        "price": 1850,
        "property_type": "apartment",
    })
}

#[derive(Default)]
pub(crate) struct FakeListingRepository {
    pub(crate) listings: Mutex<HashMap<ListingId, Listing>>,
    pub(crate) reject_writes: bool,
}

#[async_trait]
impl ListingRepository for FakeListingRepository {
    async fn insert(&self, listing: NewListing) -> AppResult<Listing> {
        if self.reject_writes {
            return Err(AppError::Remote("connection reset by peer".to_owned()));
        }
        let listing = Listing::create(ListingId::new(), listing, Utc::now());
        self.listings
            .lock()
            .await
            .insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn find_by_id(&self, id: ListingId) -> AppResult<Option<Listing>> {
        Ok(self.listings.lock().await.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[ListingId]) -> AppResult<Vec<Listing>> {
        let listings = self.listings.lock().await;
        Ok(ids.iter().filter_map(|id| listings.get(id).cloned()).collect())
    }

    async fn update(&self, id: ListingId, changes: ListingChanges) -> AppResult<Option<Listing>> {
        let mut listings = self.listings.lock().await;
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
        let mut listings = self.listings.lock().await;
        Ok(listings.get_mut(&id).map(|listing| {
            listing.approved = approved;
            listing.featured = featured;
            listing.clone()
        }))
    }

    async fn delete(&self, id: ListingId) -> AppResult<bool> {
        Ok(self.listings.lock().await.remove(&id).is_some())
    }

    async fn list(&self, filter: &ListingFilter, page: PageRequest) -> AppResult<ListingPage> {
        let listings = self.listings.lock().await;
        let matching: Vec<Listing> = listings
            .values()
            .filter(|listing| filter.matches(listing))
            .cloned()
            .collect();
        let total = matching.len() as u64;

        Ok(ListingPage {
            listings: matching
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect(),
            total,
        })
    }

    async fn list_property_types(&self) -> AppResult<Vec<String>> {
        let mut types: Vec<String> = self
            .listings
            .lock()
            .await
            .values()
            .filter(|listing| listing.approved)
            .map(|listing| listing.details.property_type.clone())
            .collect();
        types.sort();
        types.dedup();
        Ok(types)
    }
}

#[derive(Default)]
pub(crate) struct FakeSavedListingRepository {
    pub(crate) saved: Mutex<Vec<SavedListing>>,
}

#[async_trait]
impl SavedListingRepository for FakeSavedListingRepository {
    async fn upsert(
        &self,
        user_id: UserId,
        listing_id: ListingId,
        notes: Option<String>,
    ) -> AppResult<(SavedListing, SaveOutcome)> {
        let mut saved = self.saved.lock().await;
        if let Some(existing) = saved
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
        saved.push(record.clone());
        Ok((record, SaveOutcome::Created))
    }

    async fn update_notes(
        &self,
        id: SavedListingId,
        user_id: UserId,
        notes: Option<String>,
    ) -> AppResult<Option<SavedListing>> {
        let mut saved = self.saved.lock().await;
        Ok(saved
            .iter_mut()
            .find(|record| record.id == id && record.user_id == user_id)
            .map(|record| {
                record.notes = notes;
                record.clone()
            }))
    }

    async fn delete_for_user(&self, id: SavedListingId, user_id: UserId) -> AppResult<bool> {
        let mut saved = self.saved.lock().await;
        let before = saved.len();
        saved.retain(|record| !(record.id == id && record.user_id == user_id));
        Ok(saved.len() < before)
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<SavedListing>> {
        Ok(self
            .saved
            .lock()
            .await
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeProfileRepository {
    pub(crate) profiles: Mutex<HashMap<UserId, Profile>>,
}

#[async_trait]
impl ProfileRepository for FakeProfileRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<Profile>> {
        Ok(self.profiles.lock().await.get(&user_id).cloned())
    }

    async fn insert_if_missing(&self, profile: Profile) -> AppResult<Profile> {
        Ok(self
            .profiles
            .lock()
            .await
            .entry(profile.id)
            .or_insert(profile)
            .clone())
    }

    async fn update(&self, user_id: UserId, update: ProfileUpdate) -> AppResult<Option<Profile>> {
        let mut profiles = self.profiles.lock().await;
        Ok(profiles.get_mut(&user_id).map(|profile| {
            profile.apply(update, Utc::now());
            profile.clone()
        }))
    }
}

#[derive(Default)]
pub(crate) struct RecordingViewInvalidator {
    pub(crate) paths: Mutex<Vec<ViewPath>>,
    pub(crate) fail: bool,
}

#[async_trait]
impl ViewInvalidator for RecordingViewInvalidator {
    async fn invalidate(&self, paths: &[ViewPath]) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Remote("cache unavailable".to_owned()));
        }
        self.paths.lock().await.extend_from_slice(paths);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeObjectStore {
    pub(crate) objects: Mutex<HashMap<String, (String, usize)>>,
    pub(crate) removed: Mutex<Vec<String>>,
    pub(crate) uploads: Mutex<Vec<UploadOptions>>,
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    fn bucket(&self) -> &str {
        "listing-images"
    }

    async fn upload(
        &self,
        path: &ImageObjectPath,
        bytes: Vec<u8>,
        content_type: &str,
        options: UploadOptions,
    ) -> AppResult<()> {
        let mut objects = self.objects.lock().await;
        if objects.contains_key(path.as_str()) && !options.upsert {
            return Err(AppError::Remote("The resource already exists".to_owned()));
        }
        objects.insert(
            path.as_str().to_owned(),
            (content_type.to_owned(), bytes.len()),
        );
        self.uploads.lock().await.push(options);
        Ok(())
    }

    fn public_url(&self, path: &ImageObjectPath) -> String {
        format!(
            "https://project.example.co/storage/v1/object/public/listing-images/{}",
            path.as_str()
        )
    }

    async fn remove(&self, paths: &[ImageObjectPath]) -> AppResult<()> {
        let mut objects = self.objects.lock().await;
        let mut removed = self.removed.lock().await;
        for path in paths {
            objects.remove(path.as_str());
            removed.push(path.as_str().to_owned());
        }
        Ok(())
    }
}
