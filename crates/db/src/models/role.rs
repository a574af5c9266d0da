//! Role lookup row.

use civic_core::types::DbId;
use sqlx::FromRow;

/// The part of a `roles` row the API needs: the name behind a `role_id`.
#[derive(Debug, Clone, FromRow)]
pub struct Role {
    pub id: DbId,
    pub name: String,
}
