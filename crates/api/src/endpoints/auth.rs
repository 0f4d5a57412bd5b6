//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use dishcovery_common::AppResult;
use dishcovery_core::{ChangePasswordInput, CreateUserInput, UpdateProfileInput};
use dishcovery_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Token plus the user it identifies.
#[derive(Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: user::Model,
}

/// Create a new account and sign in.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let user = state.user_service.register(input).await?;
    let token = state
        .tokens
        .issue(&user.id, &user.email, &user.name, user.role.as_str())?;

    Ok(ApiResponse::created(AuthPayload { token, user })
        .with_message("Account created successfully"))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sign in to an existing account.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let user = state
        .user_service
        .authenticate(&req.email, &req.password)
        .await?;
    let token = state
        .tokens
        .issue(&user.id, &user.email, &user.name, user.role.as_str())?;

    Ok(ApiResponse::ok(AuthPayload { token, user }))
}

/// Current profile.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<user::Model> {
    ApiResponse::ok(user)
}

/// Update the current profile.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<user::Model>> {
    let updated = state.user_service.update_profile(&user.id, input).await?;
    Ok(ApiResponse::ok(updated).with_message("Profile updated"))
}

/// Change the current password.
async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.change_password(&user.id, input).await?;
    Ok(ApiResponse::ok(()).with_message("Password changed"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
        .route("/change-password", post(change_password))
}
