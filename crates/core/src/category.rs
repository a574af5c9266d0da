//! Category name rules and the delete policy.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, FieldErrors};

/// Maximum length of a category name (characters).
pub const MAX_NAME_LENGTH: usize = 100;

/// Validate and normalize a category name for insertion.
///
/// Surrounding whitespace is trimmed. `name_taken` reports whether another
/// category already has this name, compared case-insensitively.
pub fn check_new_name(name: &str, name_taken: bool) -> Result<String, CoreError> {
    let trimmed = name.trim();
    let mut errors = FieldErrors::new();

    if trimmed.is_empty() {
        errors.add("name", "Category name must not be empty");
    } else if trimmed.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            "name",
            format!("Category name must be at most {MAX_NAME_LENGTH} characters"),
        );
    } else if name_taken {
        errors.add("name", "Category already exists");
    }

    errors.into_result()?;
    Ok(trimmed.to_string())
}

/// What happens to requests filed under a category when staff delete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryDeletePolicy {
    /// Refuse the delete while any request references the category.
    #[default]
    Restrict,
    /// Delete the category together with every request filed under it.
    Cascade,
}

impl CategoryDeletePolicy {
    /// Decide whether a delete may proceed given the number of requests that
    /// still reference the category.
    pub fn check(self, referencing_requests: i64) -> Result<(), CoreError> {
        match self {
            CategoryDeletePolicy::Restrict if referencing_requests > 0 => {
                Err(CoreError::Conflict(format!(
                    "Category is used by {referencing_requests} request(s) and cannot be deleted"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for CategoryDeletePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restrict" => Ok(CategoryDeletePolicy::Restrict),
            "cascade" => Ok(CategoryDeletePolicy::Cascade),
            other => Err(CoreError::Validation(format!(
                "Invalid category delete policy '{other}'. Must be one of: restrict, cascade"
            ))),
        }
    }
}
