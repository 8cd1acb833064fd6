//! Shared primitives for all Rust crates in Rentline.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;
mod field_errors;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use auth::UserIdentity;
pub use field_errors::{FORM_FIELD, FieldErrors};

/// Result type used across Rentline crates.
pub type AppResult<T> = Result<T, AppError>;

/// Identifier of an authenticated user, shared by the auth provider and the profile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid user id '{value}': {error}")))
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// No caller could be resolved for the request.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Caller is authenticated but lacks the required role or ownership.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Input failed schema validation; carries per-field messages.
    #[error("validation failed: {0}")]
    InvalidFields(FieldErrors),

    /// Invalid input that is not attached to a specific schema field.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A call to the relational store, object store or auth provider returned an error.
    #[error("remote operation failed: {0}")]
    Remote(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the human-readable message without the category prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidFields(_) => "Validation failed".to_owned(),
            Self::Unauthenticated(message)
            | Self::Forbidden(message)
            | Self::Validation(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Remote(message)
            | Self::Internal(message) => message.clone(),
        }
    }

    /// Returns the field error map when this is a schema validation failure.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidFields(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(value: FieldErrors) -> Self {
        Self::InvalidFields(value)
    }
}
