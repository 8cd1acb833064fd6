use std::collections::HashMap;

use async_trait::async_trait;
use rentline_application::{ObjectStore, UploadOptions};
use rentline_core::{AppError, AppResult};
use rentline_domain::ImageObjectPath;
use tokio::sync::RwLock;

/// Object kept by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// MIME type given at upload.
    pub content_type: String,
    /// Object contents.
    pub bytes: Vec<u8>,
    /// Cache lifetime given at upload.
    pub cache_control_seconds: u32,
}

/// In-memory object store for local runs and tests.
#[derive(Debug)]
pub struct InMemoryObjectStore {
    bucket: String,
    public_base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryObjectStore {
    /// Creates an empty store whose public URLs start with `public_base_url`.
    #[must_use]
    pub fn new(bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_owned(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a stored object by path.
    pub async fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn bucket(&self) -> &str {
        self.bucket.as_str()
    }

    async fn upload(
        &self,
        path: &ImageObjectPath,
        bytes: Vec<u8>,
        content_type: &str,
        options: UploadOptions,
    ) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        if !options.upsert && objects.contains_key(path.as_str()) {
            return Err(AppError::Remote("The resource already exists".to_owned()));
        }

        objects.insert(
            path.as_str().to_owned(),
            StoredObject {
                content_type: content_type.to_owned(),
                bytes,
                cache_control_seconds: options.cache_control_seconds,
            },
        );
        Ok(())
    }

    fn public_url(&self, path: &ImageObjectPath) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.public_base_url,
            self.bucket,
            path.as_str()
        )
    }

    async fn remove(&self, paths: &[ImageObjectPath]) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(path.as_str());
        }
        Ok(())
    }
}
