//! Repository for the seeded `roles` table.

use civic_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::Role;

/// Name placeholder for a `role_id` with no matching row.
pub const UNKNOWN_ROLE: &str = "unknown";

pub struct RoleRepo;

impl RoleRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The role name carried in tokens and profiles, or [`UNKNOWN_ROLE`].
    pub async fn resolve_name(pool: &PgPool, role_id: DbId) -> Result<String, sqlx::Error> {
        Ok(Self::find_by_id(pool, role_id)
            .await?
            .map_or_else(|| UNKNOWN_ROLE.to_string(), |role| role.name))
    }
}
