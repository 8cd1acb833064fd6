use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use rentline_core::{AppError, AppResult};
use rentline_domain::schemas::DELETE_IMAGE;
use rentline_domain::{ImageObjectPath, validate_image_upload};

use crate::listing_service::remote_failure;
use crate::{ActionInput, ObjectStore, RequestContext, UploadOptions, validate_action_input};

/// File received from a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Client-side file name.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Stored upload location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Public URL to embed in a listing.
    pub url: String,
    /// Object path relative to the bucket.
    pub path: String,
}

#[derive(Debug, Deserialize)]
struct DeleteImageRequest {
    #[serde(rename = "imageUrl")]
    image_url: String,
}

/// Action named in the sign-in prompt for uploads.
pub const UPLOAD_IMAGES_ACTION: &str = "upload images";

/// Application service for listing photos.
#[derive(Clone)]
pub struct ImageService {
    object_store: Arc<dyn ObjectStore>,
}

impl ImageService {
    /// Creates a new image service.
    #[must_use]
    pub fn new(object_store: Arc<dyn ObjectStore>) -> Self {
        Self { object_store }
    }

    /// Uploads a photo under the caller's folder and returns its public URL.
    pub async fn upload_image(
        &self,
        context: &RequestContext,
        file: Option<ImageUpload>,
    ) -> AppResult<UploadedImage> {
        let caller = context.require_auth(UPLOAD_IMAGES_ACTION)?;
        let file = file.ok_or_else(|| AppError::Validation("No file provided".to_owned()))?;
        validate_image_upload(&file.content_type, file.bytes.len())?;

        let path = ImageObjectPath::for_upload(caller.user_id(), &file.file_name, &file.content_type);
        self.object_store
            .upload(
                &path,
                file.bytes,
                &file.content_type,
                UploadOptions::listing_image(),
            )
            .await
            .map_err(|error| remote_failure("Failed to upload image", error))?;

        info!(path = %path.as_str(), user_id = %caller.user_id(), "listing image uploaded");

        Ok(UploadedImage {
            url: self.object_store.public_url(&path),
            path: path.as_str().to_owned(),
        })
    }

    /// Deletes a photo by public URL. Owners delete their own uploads; admins delete any.
    pub async fn delete_image(
        &self,
        context: &RequestContext,
        input: ActionInput,
    ) -> AppResult<String> {
        let caller = context.require_auth("delete images")?;
        let request: DeleteImageRequest = validate_action_input(&DELETE_IMAGE, input)?;

        let path = ImageObjectPath::from_public_url(&request.image_url, self.object_store.bucket())?;
        if !caller.is_admin() && !path.is_owned_by(caller.user_id()) {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this image".to_owned(),
            ));
        }

        self.object_store
            .remove(std::slice::from_ref(&path))
            .await
            .map_err(|error| remote_failure("Failed to delete image", error))?;

        info!(path = %path.as_str(), user_id = %caller.user_id(), "listing image deleted");

        Ok(path.as_str().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use rentline_core::{AppError, UserId};
    use rentline_domain::{MAX_IMAGE_BYTES, Role};

    use crate::test_support::{FakeObjectStore, context_for};
    use crate::{RequestContext, UploadOptions};

    use super::{ImageService, ImageUpload};

    fn png(size: usize) -> Option<ImageUpload> {
        Some(ImageUpload {
            file_name: "kitchen.png".to_owned(),
            content_type: "image/png".to_owned(),
            bytes: vec![0; size],
        })
    }

    fn url_for(owner: &str) -> String {
        format!("https://project.example.co/storage/v1/object/public/listing-images/{owner}/photo.png")
    }

    #[tokio::test]
    async fn upload_stores_under_caller_folder() {
        let store = Arc::new(FakeObjectStore::default());
        let service = ImageService::new(store.clone());
        let (agent, agent_id) = context_for(Role::Agent);

        let uploaded = service
            .upload_image(&agent, png(1024))
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(uploaded.path.starts_with(&format!("{agent_id}/")));
        assert!(uploaded.path.ends_with(".png"));
        assert!(uploaded.url.ends_with(&uploaded.path));
        assert!(store.objects.lock().await.contains_key(&uploaded.path));
        assert_eq!(
            store.uploads.lock().await.as_slice(),
            [UploadOptions::listing_image()].as_slice()
        );
    }

    #[tokio::test]
    async fn rejected_files_never_reach_the_store() {
        let store = Arc::new(FakeObjectStore::default());
        let service = ImageService::new(store.clone());
        let (agent, _) = context_for(Role::Agent);

        let pdf = service
            .upload_image(
                &agent,
                Some(ImageUpload {
                    file_name: "lease.pdf".to_owned(),
                    content_type: "application/pdf".to_owned(),
                    bytes: vec![1, 2, 3],
                }),
            )
            .await;
        let oversized = service.upload_image(&agent, png(MAX_IMAGE_BYTES + 1)).await;
        let missing = service.upload_image(&agent, None).await;
        let anonymous = service
            .upload_image(&RequestContext::anonymous(), png(10))
            .await;

        assert!(matches!(
            pdf,
            Err(AppError::Validation(message))
                if message == "Invalid file type. Only JPEG, PNG, and WebP images are allowed."
        ));
        assert!(matches!(oversized, Err(AppError::Validation(_))));
        assert!(matches!(
            missing,
            Err(AppError::Validation(message)) if message == "No file provided"
        ));
        assert!(matches!(anonymous, Err(AppError::Unauthenticated(_))));
        assert!(store.objects.lock().await.is_empty());
    }

    #[tokio::test]
    async fn owner_and_admin_may_delete() {
        let store = Arc::new(FakeObjectStore::default());
        let service = ImageService::new(store.clone());
        let (owner, owner_id) = context_for(Role::Agent);
        let (admin, _) = context_for(Role::Admin);

        let by_owner = service
            .delete_image(&owner, json!({"imageUrl": url_for(&owner_id.to_string())}).into())
            .await;
        let by_admin = service
            .delete_image(&admin, json!({"imageUrl": url_for(&owner_id.to_string())}).into())
            .await;

        assert!(matches!(by_owner, Ok(path) if path == format!("{owner_id}/photo.png")));
        assert!(by_admin.is_ok());
        assert_eq!(store.removed.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn non_owner_cannot_delete() {
        let store = Arc::new(FakeObjectStore::default());
        let service = ImageService::new(store.clone());
        let (agent, _) = context_for(Role::Agent);

        let result = service
            .delete_image(&agent, json!({"imageUrl": url_for(&UserId::new().to_string())}).into())
            .await;

        assert!(matches!(
            result,
            Err(AppError::Forbidden(message))
                if message == "You do not have permission to delete this image"
        ));
        assert!(store.removed.lock().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_urls_fail_before_the_store() {
        let store = Arc::new(FakeObjectStore::default());
        let service = ImageService::new(store.clone());
        let (agent, _) = context_for(Role::Agent);

        let outside_bucket = service
            .delete_image(
                &agent,
                json!({"imageUrl": "https://cdn.example.co/avatars/a/b.png"}).into(),
            )
            .await;
        let not_a_url = service
            .delete_image(&agent, json!({"imageUrl": "photo.png"}).into())
            .await;

        assert!(matches!(
            outside_bucket,
            Err(AppError::Validation(message)) if message == "Invalid image URL format"
        ));
        assert!(matches!(not_a_url, Err(AppError::InvalidFields(_))));
        assert!(store.removed.lock().await.is_empty());
    }
}
