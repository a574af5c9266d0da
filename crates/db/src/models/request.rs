//! Citizen request entity model, DTOs and query filters.

use civic_core::lifecycle::{RequestSnapshot, RequestStatus};
use civic_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Request {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category_id: DbId,
    /// Path relative to the media root, e.g. `requests_photos/3/<uuid>.png`.
    pub photo: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub user_id: DbId,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Request {
    /// The lifecycle view of this row.
    pub fn snapshot(&self) -> RequestSnapshot<'_> {
        RequestSnapshot {
            owner_id: self.user_id,
            status: self.status,
            comment: self.comment.as_deref(),
            has_photo: self.photo.is_some(),
        }
    }
}

/// DTO for inserting a request. Status always starts at `new`.
#[derive(Debug)]
pub struct CreateRequest {
    pub title: String,
    pub description: String,
    pub category_id: DbId,
    pub photo: Option<String>,
    pub user_id: DbId,
}

/// Column values written by an accepted status transition.
#[derive(Debug)]
pub struct ApplyTransition {
    pub status: RequestStatus,
    pub comment: Option<String>,
    /// New photo path; `None` keeps the stored one.
    pub photo: Option<String>,
}

/// Staff listing filter. All filters are optional and combined with AND.
#[derive(Debug, Default)]
pub struct AdminRequestFilter {
    pub status: Option<RequestStatus>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    /// Free text matched against title, description and owner username.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
