#![forbid(unsafe_code)]

//! Field validators for the contact form.
//!
//! All validators look at the trimmed value and measure length in
//! characters, not bytes.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum name length.
pub const NAME_MIN_CHARS: usize = 2;
/// Minimum message length.
pub const MESSAGE_MIN_CHARS: usize = 10;

/// `local@domain.tld`-shaped; no whitespace and no second `@` in any part.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    #[error("field is empty")]
    EmptyField,
    #[error("value is too short")]
    TooShort,
    #[error("value is not in the expected format")]
    InvalidFormat,
}

/// The three contact form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Name,
    Email,
    Message,
}

impl FieldKind {
    /// Fields in form order.
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    /// Run this field's validator.
    pub fn validate(self, value: &str) -> Result<(), ValidationError> {
        match self {
            Self::Name => validate_name(value),
            Self::Email => validate_email(value),
            Self::Message => validate_message(value),
        }
    }

    /// User-facing text for a validation failure on this field.
    #[must_use]
    pub const fn message(self, error: ValidationError) -> &'static str {
        use ValidationError::*;
        match (self, error) {
            (Self::Name, EmptyField) => "Name is required",
            (Self::Name, _) => "Name must be at least 2 characters",
            (Self::Email, EmptyField) => "Email is required",
            (Self::Email, _) => "Please enter a valid email address",
            (Self::Message, EmptyField) => "Message is required",
            (Self::Message, _) => "Message must be at least 10 characters",
        }
    }
}

pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    min_chars(value.trim(), NAME_MIN_CHARS)
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::EmptyField)
    } else if !EMAIL_PATTERN.is_match(value) {
        Err(ValidationError::InvalidFormat)
    } else {
        Ok(())
    }
}

pub fn validate_message(value: &str) -> Result<(), ValidationError> {
    min_chars(value.trim(), MESSAGE_MIN_CHARS)
}

fn min_chars(value: &str, min: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::EmptyField)
    } else if value.chars().count() < min {
        Err(ValidationError::TooShort)
    } else {
        Ok(())
    }
}
