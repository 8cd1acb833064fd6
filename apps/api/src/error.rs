use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rentline_application::{ActionResult, UNEXPECTED_ERROR_MESSAGE};
use rentline_core::{AppError, AppResult};
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = match &self.0 {
            AppError::Internal(detail) => {
                error!(error = %detail, "request failed");
                UNEXPECTED_ERROR_MESSAGE.to_owned()
            }
            other => other.message(),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Answers a mutation action with the uniform result body.
pub fn action_response<T: Serialize>(action: &str, result: AppResult<T>) -> Response {
    let status = result
        .as_ref()
        .map_or_else(status_for, |_| StatusCode::OK);

    (status, Json(ActionResult::from_result(action, result))).into_response()
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::InvalidFields(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Remote(_) => StatusCode::BAD_GATEWAY,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use rentline_core::{AppError, FieldErrors};

    use super::{ApiError, action_response};

    #[test]
    fn action_failures_keep_their_category_status() {
        let cases = [
            (
                AppError::Unauthenticated("You must be logged in".to_owned()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::InvalidFields(FieldErrors::single("title", "Title is required")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Remote("Failed to create listing".to_owned()),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, expected) in cases {
            let response = action_response::<()>("create listing", Err(error));
            assert_eq!(response.status(), expected);
        }
        assert_eq!(
            action_response("create listing", Ok(())).status(),
            StatusCode::OK
        );
    }

    #[test]
    fn internal_errors_map_to_server_error() {
        let response = ApiError(AppError::Internal("pool closed".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
