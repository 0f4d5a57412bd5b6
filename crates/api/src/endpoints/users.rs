//! User profile and user-follow endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use dishcovery_common::AppResult;
use dishcovery_db::entities::{user, user_follow};
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Public profile with follow counts.
#[derive(Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: user::Model,
    pub followers: u64,
    pub following: u64,
}

/// Public profile of a user.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserProfile>> {
    let user = state.user_service.get(&id).await?;
    let (followers, following) = state.follow_service.user_follow_counts(&id).await?;

    Ok(ApiResponse::ok(UserProfile {
        user,
        followers,
        following,
    }))
}

/// Follow a user.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<user_follow::Model>> {
    let follow = state.follow_service.follow_user(&user.id, &id).await?;
    Ok(ApiResponse::created(follow).with_message("Now following this user"))
}

/// Stop following a user.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.follow_service.unfollow_user(&user.id, &id).await?;
    Ok(ApiResponse::ok(()).with_message("Unfollowed"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(show))
        .route("/{id}/follow", post(follow).delete(unfollow))
}
