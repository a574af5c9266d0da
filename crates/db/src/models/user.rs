//! User entity model and DTOs.

use civic_core::district::District;
use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`ProfileResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub consent: bool,
    #[sqlx(try_from = "String")]
    pub district: District,
    pub role_id: DbId,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The profile read model: everything about a user except the hash.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: DbId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub consent: bool,
    pub district: District,
    /// Localized district name, e.g. `"Кировский"`.
    pub district_name: &'static str,
    /// Resolved role name (`"staff"` or `"citizen"`).
    pub role: String,
    pub role_id: DbId,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl ProfileResponse {
    pub fn from_user(user: &User, role: String) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            consent: user.consent,
            district: user.district,
            district_name: user.district.display_name(),
            role,
            role_id: user.role_id,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub consent: bool,
    pub district: District,
    pub role_id: DbId,
}
