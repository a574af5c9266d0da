//! Route definitions for the `/account` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/account`. All require auth.
///
/// ```text
/// GET  /          -> profile
/// PUT  /district  -> update_district
/// POST /password  -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile))
        .route("/district", put(account::update_district))
        .route("/password", post(account::change_password))
}
