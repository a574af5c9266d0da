//! Repository for the `requests` table.

use civic_core::lifecycle::RequestStatus;
use civic_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use civic_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::request::{AdminRequestFilter, ApplyTransition, CreateRequest, Request};

const COLUMNS: &str = "id, title, description, category_id, photo, status, user_id, comment, \
                       created_at, updated_at";

/// Same columns qualified with the `r` alias, for joined queries.
const R_COLUMNS: &str = "r.id, r.title, r.description, r.category_id, r.photo, r.status, \
                         r.user_id, r.comment, r.created_at, r.updated_at";

/// Foreign key from `requests.category_id` to `categories`.
pub const FK_REQUESTS_CATEGORY: &str = "fk_requests_category_id";

/// Provides CRUD and lifecycle operations for citizen requests.
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a request with status `new`.
    ///
    /// Violates [`FK_REQUESTS_CATEGORY`] if the category is deleted after
    /// the caller checked it.
    pub async fn create(pool: &PgPool, input: &CreateRequest) -> Result<Request, sqlx::Error> {
        let query = format!(
            "INSERT INTO requests (title, description, category_id, photo, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(&input.photo)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Request>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requests WHERE id = $1");
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a request only if it belongs to `user_id`.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Request>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requests WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// A user's requests, newest first, optionally restricted to one status.
    pub async fn list_for_owner(
        pool: &PgPool,
        user_id: DbId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<Request>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM requests
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(user_id)
            .bind(status.map(RequestStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// A user's `limit` most recent requests.
    pub async fn recent_for_owner(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<Request>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM requests
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Staff listing with filtering and pagination, newest first.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &AdminRequestFilter,
    ) -> Result<Vec<Request>, sqlx::Error> {
        let limit = clamp_limit(filter.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(filter.offset);

        let (where_clause, bind_values, bind_idx) = build_admin_filter(filter);
        let query = format!(
            "SELECT {R_COLUMNS} FROM requests r
             JOIN users u ON u.id = r.user_id
             {where_clause}
             ORDER BY r.created_at DESC, r.id DESC
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, Request>(&query);
        for val in &bind_values {
            q = match val {
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count requests matching the staff filter (for pagination metadata).
    pub async fn count_filtered(
        pool: &PgPool,
        filter: &AdminRequestFilter,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_admin_filter(filter);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM requests r
             JOIN users u ON u.id = r.user_id
             {where_clause}"
        );

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for val in &bind_values {
            q = match val {
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q.fetch_one(pool).await
    }

    /// Read and lock a request for a status transition.
    ///
    /// With `owner` set, only that user's request is visible.
    pub async fn lock_for_update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        owner: Option<DbId>,
    ) -> Result<Option<Request>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM requests
             WHERE id = $1 AND ($2::BIGINT IS NULL OR user_id = $2)
             FOR UPDATE"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Write an accepted transition to a row locked by [`Self::lock_for_update`].
    pub async fn apply_transition(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        input: &ApplyTransition,
    ) -> Result<Request, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET
                status = $2,
                comment = $3,
                photo = COALESCE($4, photo)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(input.status.as_str())
            .bind(&input.comment)
            .bind(&input.photo)
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete a request only while its status is `new`, as one statement.
    ///
    /// With `owner` set, only that user's request can match. Returns `true`
    /// if a row was deleted; on `false` the caller re-reads to tell a missing
    /// request from one that has moved on.
    pub async fn delete_if_new(
        pool: &PgPool,
        id: DbId,
        owner: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM requests
             WHERE id = $1 AND status = $2 AND ($3::BIGINT IS NULL OR user_id = $3)",
        )
        .bind(id)
        .bind(RequestStatus::New.as_str())
        .bind(owner)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Filter building
// ---------------------------------------------------------------------------

enum BindValue {
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from the staff filter.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is empty
/// when no filter is active.
fn build_admin_filter(filter: &AdminRequestFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_values: Vec<BindValue> = Vec::new();
    let mut bind_idx = 1u32;

    if let Some(status) = filter.status {
        conditions.push(format!("r.status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(status.as_str().to_string()));
    }

    if let Some(from) = filter.created_from {
        conditions.push(format!("r.created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = filter.created_to {
        conditions.push(format!("r.created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        conditions.push(format!(
            "(r.title ILIKE ${bind_idx} OR r.description ILIKE ${bind_idx} OR u.username ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{}%", escape_like(q))));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Escape LIKE wildcards so user text matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
