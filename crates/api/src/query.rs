//! Shared query parameter types for API handlers.

use chrono::{DateTime, Utc};
use civic_core::error::{CoreError, FieldErrors};
use civic_core::lifecycle::RequestStatus;
use civic_core::types::Timestamp;
use civic_db::models::request::AdminRequestFilter;
use serde::Deserialize;

/// `?status=` filter for a citizen's own request listing.
///
/// Kept as a raw string so an unknown value is reported as a field error
/// instead of a bare deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}

impl StatusFilterParams {
    /// The parsed status, `None` when absent or blank.
    pub fn parse(&self) -> Result<Option<RequestStatus>, CoreError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => RequestStatus::parse_field(raw).map(Some),
        }
    }
}

/// Query parameters of the staff request listing.
///
/// Status and dates arrive as raw strings for the same reason as
/// [`StatusFilterParams`]; a blank value means no filter.
#[derive(Debug, Default, Deserialize)]
pub struct AdminRequestParams {
    pub status: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AdminRequestParams {
    /// Parse into a repository filter, reporting every bad value at once.
    pub fn into_filter(self) -> Result<AdminRequestFilter, CoreError> {
        let mut errors = FieldErrors::new();

        let status = match StatusFilterParams::from(self.status).parse() {
            Ok(status) => status,
            Err(CoreError::InvalidFields(status_errors)) => {
                errors.merge(status_errors);
                None
            }
            Err(other) => return Err(other),
        };
        let created_from = parse_timestamp("created_from", self.created_from, &mut errors);
        let created_to = parse_timestamp("created_to", self.created_to, &mut errors);
        errors.into_result()?;

        Ok(AdminRequestFilter {
            status,
            created_from,
            created_to,
            q: self.q,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

impl From<Option<String>> for StatusFilterParams {
    fn from(status: Option<String>) -> Self {
        Self { status }
    }
}

fn parse_timestamp(
    field: &str,
    raw: Option<String>,
    errors: &mut FieldErrors,
) -> Option<Timestamp> {
    let raw = raw?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(_) => {
            errors.add(
                field,
                format!("Invalid timestamp '{raw}'. Use RFC 3339, e.g. 2026-03-01T00:00:00Z"),
            );
            None
        }
    }
}
