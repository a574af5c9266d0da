//! Account registration and password-change input validation.
//!
//! Field rules are declared with `validator` derives; checks that need
//! database state (username taken, old password verified) are passed in by
//! the caller and folded into the same [`FieldErrors`] map so the client gets
//! every problem in one response.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::district::District;
use crate::error::{CoreError, FieldErrors};

/// Latin letters and hyphens only.
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z-]+$").expect("valid regex"));

/// Cyrillic letters, whitespace and hyphens only.
static FULL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[а-яА-ЯёЁ\s-]+$").expect("valid regex"));

/// Registration form as submitted by the client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters long"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(
        length(min = 1, max = 255, message = "Full name must be 1-255 characters long"),
        custom(function = "validate_full_name")
    )]
    pub full_name: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,

    #[serde(default)]
    pub consent: bool,

    #[validate(custom(function = "validate_district"))]
    pub district: String,
}

impl RegisterInput {
    /// The full name as it is stored: surrounding whitespace removed.
    pub fn normalized_full_name(&self) -> String {
        self.full_name.trim().to_string()
    }

    /// Validate every field. `username_taken` reports whether the username is
    /// already registered.
    pub fn check(&self, username_taken: bool) -> Result<District, CoreError> {
        let mut errors = field_errors_of(self);
        if username_taken {
            errors.add("username", "A user with that username already exists");
        }
        errors.into_result()?;
        self.district.parse()
    }
}

/// Password change form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordInput {
    pub old_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl ChangePasswordInput {
    /// Validate the form. `old_password_verified` is the result of checking
    /// `old_password` against the stored hash.
    pub fn check(&self, old_password_verified: bool) -> Result<(), CoreError> {
        let mut errors = field_errors_of(self);
        if !old_password_verified {
            errors.add("old_password", "Old password is incorrect");
        }
        errors.into_result()
    }
}

/// District update form.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDistrictInput {
    pub district: String,
}

impl UpdateDistrictInput {
    pub fn check(&self) -> Result<District, CoreError> {
        self.district.parse::<District>().map_err(|_| {
            let mut errors = FieldErrors::new();
            errors.add("district", district_message());
            CoreError::InvalidFields(errors)
        })
    }
}

fn field_errors_of<T: Validate>(input: &T) -> FieldErrors {
    match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => e.into(),
    }
}

fn district_message() -> &'static str {
    "District must be one of: Sovietsky, Kirovsky, Leninsky"
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    // Empty input is reported by the length rule.
    if username.is_empty() || USERNAME_RE.is_match(username) {
        return Ok(());
    }
    Err(ValidationError::new("username_charset").with_message(Cow::Borrowed(
        "Username may contain only Latin letters and hyphens",
    )))
}

fn validate_full_name(full_name: &str) -> Result<(), ValidationError> {
    // Empty input is reported by the length rule.
    if full_name.is_empty() {
        return Ok(());
    }
    let trimmed = full_name.trim();
    if !FULL_NAME_RE.is_match(trimmed) {
        return Err(ValidationError::new("full_name_charset").with_message(Cow::Borrowed(
            "Full name may contain only Cyrillic letters, spaces and hyphens",
        )));
    }
    if !trimmed.chars().any(char::is_alphabetic) {
        return Err(ValidationError::new("full_name_blank")
            .with_message(Cow::Borrowed("Full name must contain at least one letter")));
    }
    Ok(())
}

fn validate_district(district: &str) -> Result<(), ValidationError> {
    district.parse::<District>().map(|_| ()).map_err(|_| {
        ValidationError::new("district").with_message(Cow::Borrowed(district_message()))
    })
}
