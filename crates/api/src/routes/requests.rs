//! Route definitions for the `/requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::requests;
use crate::state::AppState;

/// Routes mounted at `/requests`. All require auth and only ever see the
/// caller's own requests.
///
/// ```text
/// GET    /             -> list_own (?status=)
/// POST   /             -> create (multipart)
/// GET    /recent       -> recent_own
/// GET    /{id}         -> get_own
/// DELETE /{id}         -> delete_own
/// POST   /{id}/status  -> transition_own (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(requests::list_own).post(requests::create))
        .route("/recent", get(requests::recent_own))
        .route("/{id}", get(requests::get_own).delete(requests::delete_own))
        .route("/{id}/status", post(requests::transition_own))
}
