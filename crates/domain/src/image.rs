//! Listing photo rules: accepted uploads and object-store paths.

use rentline_core::{AppError, AppResult, UserId};
use url::Url;
use uuid::Uuid;

/// Default object-store bucket holding listing photos.
pub const LISTING_IMAGE_BUCKET: &str = "listing-images";

/// Largest accepted upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted for listing photos.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Checks the declared type and size of an upload before any store call.
pub fn validate_image_upload(content_type: &str, size: usize) -> AppResult<()> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(AppError::Validation(
            "Invalid file type. Only JPEG, PNG, and WebP images are allowed.".to_owned(),
        ));
    }

    if size > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(
            "File size exceeds the 5MB limit".to_owned(),
        ));
    }

    Ok(())
}

/// Object path of a listing photo inside its bucket: `{owner}/{file name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageObjectPath(String);

impl ImageObjectPath {
    /// Generates a fresh, collision-resistant path for a user's upload.
    ///
    /// The extension comes from the client file name, falling back to the
    /// content type when the name has none.
    #[must_use]
    pub fn for_upload(owner_id: UserId, file_name: &str, content_type: &str) -> Self {
        let extension = file_extension(file_name)
            .unwrap_or_else(|| extension_for_content_type(content_type).to_owned());

        Self(format!("{owner_id}/{}.{extension}", Uuid::new_v4()))
    }

    /// Extracts the object path from a public URL of the form
    /// `.../{bucket}/{owner}/{file name}`.
    pub fn from_public_url(public_url: &str, bucket: &str) -> AppResult<Self> {
        let url = Url::parse(public_url)
            .map_err(|_| AppError::Validation("Invalid image URL".to_owned()))?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(Iterator::collect)
            .unwrap_or_default();

        let invalid_format = || AppError::Validation("Invalid image URL format".to_owned());
        let bucket_index = segments
            .iter()
            .position(|segment| *segment == bucket)
            .ok_or_else(invalid_format)?;
        let object_segments = &segments[bucket_index + 1..];
        if object_segments.len() < 2 {
            return Err(invalid_format());
        }

        Ok(Self(object_segments.join("/")))
    }

    /// Returns the path relative to the bucket.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the leading path segment, which names the uploading user.
    #[must_use]
    pub fn owner_segment(&self) -> &str {
        self.0.split('/').next().unwrap_or_default()
    }

    /// Returns whether the path was issued to the given user.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_segment() == user_id.to_string()
    }
}

fn file_extension(file_name: &str) -> Option<String> {
    let (_, extension) = file_name.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();
    let well_formed = !extension.is_empty()
        && extension.len() <= 8
        && extension.chars().all(|character| character.is_ascii_alphanumeric());

    well_formed.then_some(extension)
}

fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}
