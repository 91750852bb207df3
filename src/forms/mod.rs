//! Form definitions backing the modal dialogs and the login prompt.
//!
//! Forms hold raw user input. Converting a form into domain fields trims every
//! value, checks that required fields are present and parses dates and
//! amounts. Nothing else is validated.

use thiserror::Error;
use validator::ValidationErrors;

pub mod client;
pub mod job;
pub mod login;
pub mod payment;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),
}

/// Trims surrounding whitespace in place.
pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}
