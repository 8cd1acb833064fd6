use async_trait::async_trait;

use rentline_core::AppResult;
use rentline_domain::ImageObjectPath;

/// Options sent with an object upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// `Cache-Control` max-age, in seconds, served with the object.
    pub cache_control_seconds: u32,
    /// Whether an existing object at the same path may be overwritten.
    pub upsert: bool,
}

impl UploadOptions {
    /// Options used for listing photos.
    #[must_use]
    pub fn listing_image() -> Self {
        Self {
            cache_control_seconds: 3600,
            upsert: false,
        }
    }
}

/// Port for the hosted object store. Each adapter is bound to one bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the bucket this store writes to.
    fn bucket(&self) -> &str;

    /// Uploads a blob under a path.
    async fn upload(
        &self,
        path: &ImageObjectPath,
        bytes: Vec<u8>,
        content_type: &str,
        options: UploadOptions,
    ) -> AppResult<()>;

    /// Returns the public URL of an object.
    fn public_url(&self, path: &ImageObjectPath) -> String;

    /// Removes objects by path.
    async fn remove(&self, paths: &[ImageObjectPath]) -> AppResult<()>;
}
