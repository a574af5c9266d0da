//! Refresh-token session rows.

use civic_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row of `user_sessions`. One row per issued refresh token.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    /// SHA-256 hex of the refresh token; the token itself is never stored.
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
}

/// Values for a freshly issued refresh token.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
