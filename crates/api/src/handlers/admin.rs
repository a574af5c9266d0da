//! Staff-only request management.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use civic_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use civic_core::types::DbId;
use civic_db::models::request::Request;
use civic_db::repositories::RequestRepo;

use crate::error::{AppError, AppResult};
use crate::form::MultipartForm;
use crate::handlers::requests::{change_status, delete_new_request};
use crate::middleware::rbac::RequireStaff;
use crate::query::AdminRequestParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// GET /api/v1/admin/requests?status=&created_from=&created_to=&q=&limit=&offset=
pub async fn list_requests(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(params): Query<AdminRequestParams>,
) -> AppResult<Json<PagedResponse<Request>>> {
    let filter = params.into_filter()?;
    let data = RequestRepo::list_filtered(&state.pool, &filter).await?;
    let total = RequestRepo::count_filtered(&state.pool, &filter).await?;

    Ok(Json(PagedResponse {
        data,
        total,
        limit: clamp_limit(filter.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(filter.offset),
    }))
}

/// GET /api/v1/admin/requests/{id}
pub async fn get_request(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Request>>> {
    let request = RequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Request", id))?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/admin/requests/{id}/status
pub async fn transition_request(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Request>>> {
    let form = MultipartForm::read(multipart).await?;
    let request = change_status(&state, staff.actor(), id, None, form).await?;
    Ok(Json(DataResponse { data: request }))
}

/// DELETE /api/v1/admin/requests/{id}
pub async fn delete_request(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_new_request(&state, &staff, id, None).await?;
    Ok(StatusCode::NO_CONTENT)
}
