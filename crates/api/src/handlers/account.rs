//! Handlers for the signed-in user's own account.

use axum::extract::State;
use axum::Json;
use civic_core::account::{ChangePasswordInput, UpdateDistrictInput};
use civic_db::models::user::{ProfileResponse, User};
use civic_db::repositories::{RoleRepo, SessionRepo, UserRepo};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::{create_auth_response, AuthResponse};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/account
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let user = load_user(&state, &auth).await?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from_user(&user, role),
    }))
}

/// PUT /api/v1/account/district
pub async fn update_district(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateDistrictInput>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let district = input.check()?;

    let user = UserRepo::update_district(&state.pool, auth.user_id, district)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;

    tracing::info!(user_id = user.id, district = %district, "District updated");

    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from_user(&user, role),
    }))
}

/// POST /api/v1/account/password
///
/// Change the password, sign out every other session, and hand the caller a
/// fresh token pair.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<Json<AuthResponse>> {
    let user = load_user(&state, &auth).await?;

    let old_password_verified = verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    input.check(old_password_verified)?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    let revoked = SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, revoked, "Password changed, sessions revoked");

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

async fn load_user(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))
}
