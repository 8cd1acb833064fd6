use axum::extract::{Extension, Multipart, State};
use axum::response::Response;
use rentline_application::{ImageUpload, RequestContext, UPLOAD_IMAGES_ACTION};
use rentline_core::{AppError, AppResult};

use crate::dto::{DeletedImageResponse, UploadedImageResponse};
use crate::error::action_response;
use crate::extract::ActionPayload;
use crate::state::AppState;

/// Multipart field carrying the photo.
const FILE_FIELD: &str = "file";

/// POST /api/images - Upload a listing photo from the `file` multipart field.
///
/// Anonymous callers are turned away before the body is read.
pub async fn upload_image_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    multipart: Multipart,
) -> Response {
    if let Err(error) = context.require_auth(UPLOAD_IMAGES_ACTION) {
        return action_response(UPLOAD_IMAGES_ACTION, Err::<UploadedImageResponse, _>(error));
    }

    let result = match read_file_field(multipart).await {
        Ok(file) => state.image_service.upload_image(&context, file).await,
        Err(error) => Err(error),
    };

    action_response(UPLOAD_IMAGES_ACTION, result.map(UploadedImageResponse::from))
}

/// DELETE /api/images - Delete a listing photo by its public URL.
pub async fn delete_image_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    ActionPayload(input): ActionPayload,
) -> Response {
    let result = state.image_service.delete_image(&context, input).await;
    action_response(
        "delete image",
        result.map(|path| DeletedImageResponse { path }),
    )
}

async fn read_file_field(mut multipart: Multipart) -> AppResult<Option<ImageUpload>> {
    while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field.bytes().await.map_err(invalid_upload)?;
        if file_name.is_empty() && bytes.is_empty() {
            return Ok(None);
        }

        return Ok(Some(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

fn invalid_upload(error: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid upload: {}", error.body_text()))
}
