//! Admin endpoints: dashboard rollup, user administration, the restaurant
//! approval queue and review moderation. All routes require the admin role.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, put},
};
use dishcovery_common::AppResult;
use dishcovery_core::{DashboardStats, ModerationPage, UserDetail};
use dishcovery_db::{
    entities::{restaurant, user},
    repositories::{ModerationRow, ReviewModerationRow},
};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, require_admin},
    middleware::AppState,
    response::ApiResponse,
};

/// Dashboard rollup.
async fn dashboard(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DashboardStats>> {
    require_admin(&user)?;

    let stats = state.moderation_service.dashboard().await?;
    Ok(ApiResponse::ok(stats))
}

/// All users.
async fn list_users(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<user::Model>>> {
    require_admin(&user)?;

    let users = state.moderation_service.list_users().await?;
    let count = users.len() as u64;
    Ok(ApiResponse::ok(users).with_count(count))
}

/// One user; owners come with their restaurants.
async fn show_user(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserDetail>> {
    require_admin(&user)?;

    let detail = state.moderation_service.get_user(&id).await?;
    Ok(ApiResponse::ok(detail))
}

/// Role change request.
#[derive(Debug, Deserialize)]
struct RoleRequest {
    role: String,
}

/// Change a user's role.
async fn set_user_role(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RoleRequest>,
) -> AppResult<ApiResponse<user::Model>> {
    require_admin(&user)?;

    let updated = state.moderation_service.set_user_role(&id, &req.role).await?;
    Ok(ApiResponse::ok(updated).with_message("Role updated"))
}

/// Deactivate a user account.
async fn deactivate_user(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<user::Model>> {
    require_admin(&user)?;

    let updated = state
        .moderation_service
        .deactivate_user(&user.id, &id)
        .await?;
    Ok(ApiResponse::ok(updated).with_message("User deactivated"))
}

/// Delete a user account.
async fn delete_user(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    require_admin(&user)?;

    state.moderation_service.delete_user(&user.id, &id).await?;
    Ok(ApiResponse::ok(()).with_message("User deleted"))
}

/// Query for the restaurant moderation listing.
#[derive(Debug, Deserialize)]
struct ModerationQuery {
    status: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
}

/// Restaurant moderation listing.
async fn list_restaurants(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ModerationQuery>,
) -> AppResult<ApiResponse<ModerationPage<ModerationRow>>> {
    require_admin(&user)?;

    let page = state
        .moderation_service
        .list_restaurants(query.status.as_deref(), query.page, query.limit)
        .await?;
    Ok(ApiResponse::ok(page))
}

/// Status change request.
#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: String,
}

/// Approve, reject, or re-queue a restaurant.
async fn set_restaurant_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> AppResult<ApiResponse<restaurant::Model>> {
    require_admin(&user)?;

    let updated = state
        .moderation_service
        .set_restaurant_status(&id, &req.status)
        .await?;
    Ok(ApiResponse::ok(updated).with_message("Status updated"))
}

/// Hard-delete a restaurant.
async fn delete_restaurant(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    require_admin(&user)?;

    state.moderation_service.delete_restaurant(&id).await?;
    Ok(ApiResponse::ok(()).with_message("Restaurant deleted"))
}

/// Pagination query for review moderation.
#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u64>,
    limit: Option<u64>,
}

/// Review moderation listing.
async fn list_reviews(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<ModerationPage<ReviewModerationRow>>> {
    require_admin(&user)?;

    let page = state
        .moderation_service
        .list_reviews(query.page, query.limit)
        .await?;
    Ok(ApiResponse::ok(page))
}

/// Remove a review.
async fn delete_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    require_admin(&user)?;

    state.moderation_service.delete_review(&id).await?;
    Ok(ApiResponse::ok(()).with_message("Review removed"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/users", get(list_users))
        .route("/users/{id}", get(show_user).delete(delete_user))
        .route("/users/{id}/role", put(set_user_role))
        .route("/users/{id}/deactivate", put(deactivate_user))
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            delete(delete_restaurant),
        )
        .route("/restaurants/{id}/status", put(set_restaurant_status))
        .route("/reviews", get(list_reviews))
        .route("/reviews/{id}", delete(delete_review))
}
