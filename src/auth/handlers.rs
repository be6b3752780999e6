use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserEnvelope},
        extractors::CurrentUser,
        password::{hash_password, verify_password},
    },
    error::AppError,
    state::AppState,
    users::repo_types::{NewUser, StoreError},
    validation::extract_validated_json,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let payload = extract_validated_json(body)?;

    // Only the email is pre-checked here; a clashing username is caught by the
    // unique constraint on insert.
    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("User with this email already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = state
        .users
        .create(NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
        })
        .await
        .map_err(|e| {
            if let StoreError::Duplicate(constraint) = &e {
                warn!(%constraint, "registration hit unique constraint");
            }
            AppError::from(e)
        })?;

    let token = state.jwt.issue(user.id).map_err(anyhow::Error::new)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let payload = extract_validated_json(body)?;

    let Some(user) = state.users.find_by_email(&payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(AppError::BadRequest("User not registered".into()));
    };

    if !user.is_active {
        warn!(user_id = %user.id, "login on deactivated account");
        return Err(AppError::BadRequest("Account is deactivated".into()));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let token = state.jwt.issue(user.id).map_err(anyhow::Error::new)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        user: user.into(),
    }))
}

#[instrument(skip_all)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserEnvelope> {
    Json(UserEnvelope { user })
}

/// Tokens are not tracked server-side; the client discards its copy.
#[instrument(skip_all)]
pub async fn logout(CurrentUser(user): CurrentUser) -> Json<MessageResponse> {
    info!(user_id = %user.id, "user logged out");
    Json(MessageResponse {
        message: "Logged out successfully",
    })
}
