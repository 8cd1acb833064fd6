use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use rentline_application::ActionInput;
use rentline_core::AppError;
use serde_json::{Map, Value};

use crate::error::action_response;

/// Raw mutation input, taken from a JSON body or a form-encoded body.
///
/// Failures answer with the uniform action result so callers always see one shape.
#[derive(Debug)]
pub struct ActionPayload(pub ActionInput);

impl<S> FromRequest<S> for ActionPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(IntoResponse::into_response)?;

        parse_body(is_form, &bytes)
            .map(Self)
            .map_err(|error| action_response::<()>("read request body", Err(error)))
    }
}

fn parse_body(is_form: bool, bytes: &[u8]) -> Result<ActionInput, AppError> {
    if is_form {
        let pairs = url::form_urlencoded::parse(bytes)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        return Ok(ActionInput::Form(pairs));
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ActionInput::Object(Value::Object(Map::new())));
    }

    serde_json::from_slice::<Value>(bytes)
        .map(ActionInput::Object)
        .map_err(|error| AppError::Validation(format!("Invalid request body: {error}")))
}
