use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{MessageResponse, UserEnvelope},
        extractors::{AdminUser, CurrentUser},
        password::{hash_password, verify_password},
    },
    error::AppError,
    state::AppState,
    users::{
        dto::{ChangePasswordRequest, ProfileResponse, UpdateProfileRequest, UsersResponse},
        repo_types::ProfileUpdate,
    },
    validation::extract_validated_json,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/profile", get(get_profile).put(update_profile))
        .route("/users/change-password", put(change_password))
        .route("/users/:user_id", delete(delete_user))
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

#[instrument(skip_all)]
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<UserEnvelope> {
    Json(UserEnvelope { user })
}

#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let update = ProfileUpdate::from(extract_validated_json(body)?);

    if update.is_empty() {
        return Ok(Json(ProfileResponse {
            message: "Profile updated successfully",
            user: me,
        }));
    }

    let clash = state
        .users
        .find_conflicting(me.id, update.username.as_deref(), update.email.as_deref())
        .await?;
    if clash.is_some() {
        warn!(user_id = %me.id, "profile update collides with another account");
        return Err(AppError::Conflict("Username or email already exists".into()));
    }

    let user = state
        .users
        .update_profile(me.id, &update)
        .await?
        .ok_or_else(user_not_found)?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(ProfileResponse {
        message: "Profile updated successfully",
        user: user.into(),
    }))
}

#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let payload = extract_validated_json(body)?;

    // The request context carries no hash; reload the full record.
    let user = state.users.find_by_id(me.id).await?.ok_or_else(user_not_found)?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        warn!(user_id = %user.id, "change-password with wrong current password");
        return Err(AppError::BadRequest("Current password is incorrect".into()));
    }

    let password_hash = hash_password(&payload.new_password)?;
    if !state.users.set_password_hash(user.id, &password_hash).await? {
        return Err(user_not_found());
    }

    info!(user_id = %user.id, "password changed");
    Ok(Json(MessageResponse {
        message: "Password changed successfully",
    }))
}

#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<UsersResponse>, AppError> {
    let users = state.users.list().await?;
    debug!(admin_id = %admin.id, count = users.len(), "listing users");
    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = Uuid::parse_str(&user_id).map_err(|_| user_not_found())?;

    if !state.users.delete(id).await? {
        return Err(user_not_found());
    }

    info!(admin_id = %admin.id, deleted_id = %id, "user deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
