pub mod account;
pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod requests;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout
///
/// /account                             profile
/// /account/district                    update district
/// /account/password                    change password
///
/// /categories                          list
///
/// /requests                            list own, create
/// /requests/recent                     four most recent
/// /requests/{id}                       get, delete
/// /requests/{id}/status                transition
///
/// /admin/requests                      filtered listing (staff)
/// /admin/requests/{id}                 get, delete (staff)
/// /admin/requests/{id}/status          transition (staff)
/// /admin/categories                    add (staff)
/// /admin/categories/{id}               delete (staff)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/account", account::router())
        .nest("/categories", categories::router())
        .nest("/requests", requests::router())
        .nest("/admin", admin::router())
}
