//! Route definitions for the staff-only `/admin` surface.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{admin, categories};
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the `staff` role.
///
/// ```text
/// GET    /requests              -> list_requests (filters, pagination)
/// GET    /requests/{id}         -> get_request
/// DELETE /requests/{id}         -> delete_request
/// POST   /requests/{id}/status  -> transition_request (multipart)
/// POST   /categories            -> categories::create
/// DELETE /categories/{id}       -> categories::delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/requests", get(admin::list_requests))
        .route(
            "/requests/{id}",
            get(admin::get_request).delete(admin::delete_request),
        )
        .route("/requests/{id}/status", post(admin::transition_request))
        .route("/categories", post(categories::create))
        .route("/categories/{id}", delete(categories::delete))
}
