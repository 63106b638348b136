//! Error types for the Health Tracker application

use crate::validation::get_field_display_label;
use serde::Serialize;
use thiserror::Error;

/// Validation failure on a single input field
///
/// `message` is the complete sentence shown to the user; `field` is the
/// camelCase wire name of the offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            display_label: get_field_display_label(field).to_string(),
        }
    }
}

/// Authentication error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing token")]
    MissingToken,
}
