use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UsersResponse},
        extractors::AdminUser,
        jwt::JwtKeys,
        services,
    },
    config::AuthMode,
    error::AppResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/registration", post(register))
        .route("/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let user = services::register_user(state.users.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully",
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = services::authenticate_user(state.users.as_ref(), payload).await?;

    let token = match state.config.auth_mode {
        AuthMode::Token => Some(JwtKeys::from_ref(&state).sign(user.id, user.role)?),
        AuthMode::Legacy => None,
    };

    Ok(Json(LoginResponse {
        message: "Login successful",
        user: user.into(),
        token,
    }))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn list_users(
    State(state): State<AppState>,
    admin: AdminUser,
) -> AppResult<Json<UsersResponse>> {
    let users = services::list_users(state.users.as_ref()).await?;
    info!(count = users.len(), "users listed");
    Ok(Json(UsersResponse {
        message: "Users fetched successfully",
        users,
    }))
}
