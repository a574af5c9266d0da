//! Request lifecycle: statuses, authorization and transition rules.
//!
//! ```text
//! new ──► accepted_in_work ──► completed (terminal)
//! ```
//!
//! The arrow is the usual path, not an enforced graph: any non-terminal
//! status may be set to any status. What is enforced:
//!
//! - entering `accepted_in_work` requires a non-blank comment in the same call
//! - entering `completed` requires a photo, either uploaded in the same call
//!   or already attached
//! - a `completed` request can no longer be edited or deleted
//! - only `new` requests can be deleted
//! - only the owner or staff may change a request's status
//!
//! Everything here is a pure decision over a [`RequestSnapshot`]; the caller
//! performs the locked read and the write.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, FieldErrors};
use crate::types::DbId;

/// Maximum length of a request title (characters).
pub const MAX_TITLE_LENGTH: usize = 255;

/// Number of requests shown in the "recent requests" listing.
pub const RECENT_REQUESTS_LIMIT: i64 = 4;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Request status. The snake_case names are the persisted values and must
/// match the `ck_requests_status` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    New,
    AcceptedInWork,
    Completed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::New,
        RequestStatus::AcceptedInWork,
        RequestStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::AcceptedInWork => "accepted_in_work",
            RequestStatus::Completed => "completed",
        }
    }

    /// Completed requests are read-only.
    pub fn is_terminal(self) -> bool {
        self == RequestStatus::Completed
    }

    /// Parse a status submitted in a form, reporting failures against the
    /// `status` field.
    pub fn parse_field(raw: &str) -> Result<Self, CoreError> {
        raw.parse().map_err(|_| {
            let mut errors = FieldErrors::new();
            errors.add(
                "status",
                format!("Invalid status '{raw}'. Must be one of: new, accepted_in_work, completed"),
            );
            CoreError::InvalidFields(errors)
        })
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown request status '{s}'")))
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Actor & authorization
// ---------------------------------------------------------------------------

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub is_staff: bool,
}

impl Actor {
    pub fn owns(&self, owner_id: DbId) -> bool {
        self.user_id == owner_id
    }
}

/// Status changes are allowed for the request's owner and for staff.
pub fn authorize_transition(actor: &Actor, owner_id: DbId) -> Result<(), CoreError> {
    if actor.is_staff || actor.owns(owner_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the request owner or staff may change its status".into(),
        ))
    }
}

// ---------------------------------------------------------------------------
// State policies
// ---------------------------------------------------------------------------

/// A request may be deleted only while it is `new`.
pub fn check_deletable(status: RequestStatus) -> Result<(), CoreError> {
    match status {
        RequestStatus::New => Ok(()),
        RequestStatus::Completed => Err(CoreError::Conflict(
            "Completed requests are read-only and cannot be deleted".into(),
        )),
        RequestStatus::AcceptedInWork => Err(CoreError::Conflict(
            "Only requests with status 'new' can be deleted".into(),
        )),
    }
}

/// Completed requests reject every further edit.
pub fn check_editable(status: RequestStatus) -> Result<(), CoreError> {
    if status.is_terminal() {
        Err(CoreError::Conflict(
            "Completed requests are read-only and cannot be changed".into(),
        ))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// User-supplied fields of a new request (the photo is validated separately
/// by [`crate::photo::validate_photo`]).
#[derive(Debug, Clone, Default)]
pub struct RequestDraft {
    pub title: String,
    pub description: String,
    pub category_id: Option<DbId>,
}

impl RequestDraft {
    /// Collect field errors. `category_exists` reports whether `category_id`
    /// names an existing category.
    pub fn field_errors(&self, category_exists: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", "Title is required");
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            errors.add(
                "title",
                format!("Title must be at most {MAX_TITLE_LENGTH} characters"),
            );
        }

        if self.description.trim().is_empty() {
            errors.add("description", "Description is required");
        }

        match self.category_id {
            None => errors.add("category_id", "Category is required"),
            Some(_) if !category_exists => errors.add("category_id", "Unknown category"),
            Some(_) => {}
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// The current state of a request as read under lock.
#[derive(Debug, Clone, Copy)]
pub struct RequestSnapshot<'a> {
    pub owner_id: DbId,
    pub status: RequestStatus,
    pub comment: Option<&'a str>,
    pub has_photo: bool,
}

/// A status change as submitted.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub status: RequestStatus,
    pub comment: Option<String>,
    /// Whether a (validated) photo was uploaded with this call.
    pub has_new_photo: bool,
}

/// What to write once a transition has been accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub status: RequestStatus,
    /// The comment to persist: the supplied one, or the existing one kept.
    pub comment: Option<String>,
    /// Whether the stored photo is replaced by the uploaded one.
    pub replace_photo: bool,
}

/// Decide whether `actor` may apply `request` to a request in state `current`.
pub fn plan_transition(
    actor: &Actor,
    current: &RequestSnapshot<'_>,
    request: TransitionRequest,
) -> Result<TransitionPlan, CoreError> {
    authorize_transition(actor, current.owner_id)?;
    check_editable(current.status)?;

    let supplied_comment = request
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let mut errors = FieldErrors::new();
    match request.status {
        RequestStatus::AcceptedInWork if supplied_comment.is_none() => {
            errors.add(
                "comment",
                "A comment is required to accept the request into work",
            );
        }
        RequestStatus::Completed if !request.has_new_photo && !current.has_photo => {
            errors.add("photo", "A photo is required to complete the request");
        }
        _ => {}
    }
    errors.into_result()?;

    Ok(TransitionPlan {
        status: request.status,
        comment: supplied_comment.or_else(|| current.comment.map(str::to_string)),
        replace_photo: request.has_new_photo,
    })
}
