use async_trait::async_trait;
use rentline_application::{ObjectStore, UploadOptions};
use rentline_core::{AppError, AppResult};
use rentline_domain::ImageObjectPath;
use serde_json::json;
use tracing::debug;
use url::Url;

/// Object store backed by a hosted storage REST API.
#[derive(Clone)]
pub struct HttpObjectStore {
    http_client: reqwest::Client,
    base_url: Url,
    service_key: String,
    bucket: String,
}

impl HttpObjectStore {
    /// Creates a store writing to `bucket` of the project at `base_url`.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid storage URL '{base_url}': {error}"))
        })?;

        Ok(Self {
            http_client,
            base_url,
            service_key: service_key.into(),
            bucket: bucket.into(),
        })
    }

    fn object_url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::Internal("storage URL cannot carry a path".to_owned()))?
            .pop_if_empty()
            .extend(["storage", "v1", "object"])
            .extend(segments);

        Ok(url)
    }

    async fn send(&self, context: &str, builder: reqwest::RequestBuilder) -> AppResult<()> {
        let response = builder
            .bearer_auth(self.service_key.as_str())
            .header("apikey", self.service_key.as_str())
            .send()
            .await
            .map_err(|error| AppError::Remote(format!("{context}: {error}")))?;
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        Err(AppError::Remote(format!(
            "{context} with status {status}: {body}"
        )))
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
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
        let mut segments = vec![self.bucket.as_str()];
        segments.extend(path.as_str().split('/'));
        let url = self.object_url(&segments)?;

        debug!(path = %path.as_str(), size = bytes.len(), "uploading object");
        self.send(
            "storage upload failed",
            self.http_client
                .post(url)
                .header("content-type", content_type)
                .header(
                    "cache-control",
                    format!("max-age={}", options.cache_control_seconds),
                )
                .header("x-upsert", if options.upsert { "true" } else { "false" })
                .body(bytes),
        )
        .await
    }

    fn public_url(&self, path: &ImageObjectPath) -> String {
        let mut segments = vec!["public", self.bucket.as_str()];
        segments.extend(path.as_str().split('/'));

        self.object_url(&segments)
            .map(String::from)
            .unwrap_or_else(|_| {
                format!(
                    "{}/storage/v1/object/public/{}/{}",
                    self.base_url.as_str().trim_end_matches('/'),
                    self.bucket,
                    path.as_str()
                )
            })
    }

    async fn remove(&self, paths: &[ImageObjectPath]) -> AppResult<()> {
        let url = self.object_url(&[self.bucket.as_str()])?;
        let prefixes: Vec<&str> = paths.iter().map(ImageObjectPath::as_str).collect();

        self.send(
            "storage delete failed",
            self.http_client
                .delete(url)
                .json(&json!({ "prefixes": prefixes })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use rentline_application::ObjectStore;
    use rentline_core::UserId;
    use rentline_domain::ImageObjectPath;

    use super::HttpObjectStore;

    #[test]
    fn public_urls_parse_back_into_object_paths() {
        let Ok(store) = HttpObjectStore::new(
            reqwest::Client::new(),
            "https://project.example.co",
            "service",
            "listing-images",
        ) else {
            unreachable!("valid base URL");
        };
        let owner = UserId::new();
        let path = ImageObjectPath::for_upload(owner, "front.jpg", "image/jpeg");

        let url = store.public_url(&path);

        assert!(url.starts_with(
            "https://project.example.co/storage/v1/object/public/listing-images/"
        ));
        let parsed = ImageObjectPath::from_public_url(&url, store.bucket());
        assert!(matches!(parsed, Ok(parsed) if parsed.is_owned_by(owner)));
    }
}
