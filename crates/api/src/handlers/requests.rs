//! Handlers for a citizen's own requests.
//!
//! The status-change and delete flows are shared with the staff surface in
//! [`crate::handlers::admin`]; the only difference is whether the lookup is
//! scoped to the caller.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use civic_core::error::{CoreError, FieldErrors};
use civic_core::lifecycle::{
    check_deletable, plan_transition, Actor, RequestDraft, RequestStatus, TransitionRequest,
    RECENT_REQUESTS_LIMIT,
};
use civic_core::photo::{validate_photo, ValidatedPhoto};
use civic_core::types::DbId;
use civic_db::models::request::{ApplyTransition, CreateRequest, Request};
use civic_db::repositories::request_repo::FK_REQUESTS_CATEGORY;
use civic_db::repositories::{CategoryRepo, RequestRepo};

use crate::error::{AppError, AppResult};
use crate::form::MultipartForm;
use crate::middleware::auth::AuthUser;
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/requests?status=
pub async fn list_own(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Request>>>> {
    let status = params.parse()?;
    let requests = RequestRepo::list_for_owner(&state.pool, auth.user_id, status).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/requests/recent
pub async fn recent_own(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Request>>>> {
    let requests =
        RequestRepo::recent_for_owner(&state.pool, auth.user_id, RECENT_REQUESTS_LIMIT).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/requests/{id}
pub async fn get_own(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Request>>> {
    let request = RequestRepo::find_for_owner(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Request", id))?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/requests (multipart: `title`, `description`, `category_id`,
/// optional `photo`)
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Request>>)> {
    let mut form = MultipartForm::read(multipart).await?;
    // Ids start at 1, so a non-numeric id maps to 0 and reads as unknown.
    let category_id = form
        .text("category_id")
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| raw.parse::<DbId>().unwrap_or(0));
    let category_exists = match category_id {
        Some(id) => CategoryRepo::exists(&state.pool, id).await?,
        None => false,
    };

    let draft = RequestDraft {
        title: form.text("title").unwrap_or_default().to_string(),
        description: form.text("description").unwrap_or_default().to_string(),
        category_id,
    };
    let mut errors = draft.field_errors(category_exists);

    let photo = take_photo(&mut form, &mut errors);
    errors.into_result()?;

    let photo_path = match photo {
        Some(photo) => Some(store_photo(&state, auth.user_id, &photo).await?),
        None => None,
    };

    let request = RequestRepo::create(
        &state.pool,
        &CreateRequest {
            title: draft.title.trim().to_string(),
            description: draft.description,
            // Present whenever validation passed.
            category_id: category_id.unwrap_or_default(),
            photo: photo_path,
            user_id: auth.user_id,
        },
    )
    .await
    .map_err(category_vanished)?;

    tracing::info!(
        request_id = request.id,
        user_id = auth.user_id,
        category_id = request.category_id,
        has_photo = request.photo.is_some(),
        "Request created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// DELETE /api/v1/requests/{id}
pub async fn delete_own(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_new_request(&state, &auth, id, Some(auth.user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/requests/{id}/status (multipart: `status`, optional
/// `comment`, optional `photo`)
pub async fn transition_own(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Request>>> {
    let form = MultipartForm::read(multipart).await?;
    let request = change_status(&state, auth.actor(), id, Some(auth.user_id), form).await?;
    Ok(Json(DataResponse { data: request }))
}

// ---------------------------------------------------------------------------
// Shared flows
// ---------------------------------------------------------------------------

/// Apply a submitted status change as one locked read-modify-write.
///
/// `owner_scope` restricts the lookup to that user's requests; anything
/// outside it is reported as not found.
pub(crate) async fn change_status(
    state: &AppState,
    actor: Actor,
    id: DbId,
    owner_scope: Option<DbId>,
    mut form: MultipartForm,
) -> AppResult<Request> {
    let mut errors = FieldErrors::new();
    let status = match form.text("status").map(str::trim) {
        None | Some("") => {
            errors.add("status", "Status is required");
            None
        }
        Some(raw) => match RequestStatus::parse_field(raw) {
            Ok(status) => Some(status),
            Err(CoreError::InvalidFields(status_errors)) => {
                errors.merge(status_errors);
                None
            }
            Err(other) => return Err(other.into()),
        },
    };
    let comment = form.text("comment").map(str::to_string);
    let photo = take_photo(&mut form, &mut errors);
    errors.into_result()?;
    let Some(status) = status else {
        return Err(AppError::BadRequest("Status is required".into()));
    };

    let mut tx = state.pool.begin().await?;
    let current = RequestRepo::lock_for_update(&mut tx, id, owner_scope)
        .await?
        .ok_or_else(|| AppError::not_found("Request", id))?;
    let previous = current.status;

    let plan = plan_transition(
        &actor,
        &current.snapshot(),
        TransitionRequest {
            status,
            comment,
            has_new_photo: photo.is_some(),
        },
    )?;

    // Written before the row update; a rolled-back update leaves an
    // unreferenced file behind.
    let photo_path = match photo.filter(|_| plan.replace_photo) {
        Some(photo) => Some(store_photo(state, current.user_id, &photo).await?),
        None => None,
    };

    let updated = RequestRepo::apply_transition(
        &mut tx,
        id,
        &ApplyTransition {
            status: plan.status,
            comment: plan.comment,
            photo: photo_path,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        request_id = id,
        actor_id = actor.user_id,
        staff = actor.is_staff,
        from = %previous,
        to = %updated.status,
        "Request status changed"
    );

    Ok(updated)
}

/// Delete a request that is still `new`.
///
/// The delete is a single conditional statement; when it matches nothing the
/// row is re-read to report why.
pub(crate) async fn delete_new_request(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    owner_scope: Option<DbId>,
) -> AppResult<()> {
    if RequestRepo::delete_if_new(&state.pool, id, owner_scope).await? {
        tracing::info!(request_id = id, actor_id = auth.user_id, "Request deleted");
        return Ok(());
    }

    let existing = match owner_scope {
        Some(owner) => RequestRepo::find_for_owner(&state.pool, id, owner).await?,
        None => RequestRepo::find_by_id(&state.pool, id).await?,
    };
    let request = existing.ok_or_else(|| AppError::not_found("Request", id))?;

    tracing::info!(
        request_id = id,
        actor_id = auth.user_id,
        status = %request.status,
        "Request delete refused"
    );
    check_deletable(request.status)?;
    // Became `new` again between the delete and the re-read.
    Err(AppError::Core(CoreError::Conflict(
        "The request changed while it was being deleted; try again".into(),
    )))
}

/// Report a category deleted between the existence check and the insert the
/// same way as one that never existed.
fn category_vanished(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.constraint() == Some(FK_REQUESTS_CATEGORY) => {
            let mut errors = FieldErrors::new();
            errors.add("category_id", "Unknown category");
            CoreError::InvalidFields(errors).into()
        }
        _ => err.into(),
    }
}

/// Validate the optional `photo` part, recording problems in `errors`.
fn take_photo(form: &mut MultipartForm, errors: &mut FieldErrors) -> Option<ValidatedPhoto> {
    let file = form.take_file("photo")?;
    match validate_photo("photo", &file.filename, file.bytes) {
        Ok(photo) => Some(photo),
        Err(CoreError::InvalidFields(photo_errors)) => {
            errors.merge(photo_errors);
            None
        }
        Err(other) => {
            errors.add("photo", other.to_string());
            None
        }
    }
}

async fn store_photo(state: &AppState, owner_id: DbId, photo: &ValidatedPhoto) -> AppResult<String> {
    state
        .photos
        .save(owner_id, photo)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store photo: {e}")))
}
