use rentline_application::UploadedImage;
use serde::Serialize;
use ts_rs::TS;

/// Location of an uploaded listing photo.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/uploaded-image-response.ts"
)]
pub struct UploadedImageResponse {
    pub url: String,
    pub path: String,
}

impl From<UploadedImage> for UploadedImageResponse {
    fn from(image: UploadedImage) -> Self {
        Self {
            url: image.url,
            path: image.path,
        }
    }
}

/// Object path of a deleted listing photo.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/deleted-image-response.ts"
)]
pub struct DeletedImageResponse {
    pub path: String,
}
