//! Handlers for the category catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use civic_core::category::{check_new_name, CategoryDeletePolicy};
use civic_core::types::DbId;
use civic_db::models::category::{Category, CreateCategory};
use civic_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/admin/categories
///
/// A case-insensitive duplicate is a field error; one that races past the
/// check fails on `uq_categories_name_lower` (409).
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let name_taken = CategoryRepo::exists_by_name_ci(&state.pool, input.name.trim()).await?;
    let name = check_new_name(&input.name, name_taken)?;

    let category = CategoryRepo::create(&state.pool, &CreateCategory { name }).await?;
    tracing::info!(
        category_id = category.id,
        name = %category.name,
        staff_id = staff.user_id,
        "Category created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// DELETE /api/v1/admin/categories/{id}
///
/// Behaviour depends on the configured [`CategoryDeletePolicy`].
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let policy = state.config.category_delete_policy;

    match policy {
        CategoryDeletePolicy::Restrict => {
            if CategoryRepo::find_by_id(&state.pool, id).await?.is_none() {
                return Err(AppError::not_found("Category", id));
            }
            let referencing = CategoryRepo::count_requests(&state.pool, id).await?;
            policy.check(referencing)?;

            // A request filed in between trips the foreign key (409).
            if !CategoryRepo::delete(&state.pool, id).await? {
                return Err(AppError::not_found("Category", id));
            }
            tracing::info!(category_id = id, staff_id = staff.user_id, "Category deleted");
        }
        CategoryDeletePolicy::Cascade => {
            let removed = CategoryRepo::delete_cascade(&state.pool, id)
                .await?
                .ok_or_else(|| AppError::not_found("Category", id))?;
            tracing::info!(
                category_id = id,
                staff_id = staff.user_id,
                removed_requests = removed,
                "Category deleted with its requests"
            );
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
