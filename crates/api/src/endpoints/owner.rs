//! Owner dashboard endpoints: the caller's restaurants, menus, posts and
//! per-restaurant analytics. All routes require the owner role.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use dishcovery_common::AppResult;
use dishcovery_core::{
    CreateDishInput, CreatePostInput, CreateRestaurantInput, RestaurantAnalytics,
    UpdateDishInput, UpdateRestaurantInput,
};
use dishcovery_db::{
    entities::{dish, post as post_entity, restaurant},
    repositories::{OwnerRestaurantRow, PostOwnerRow},
};

use crate::{
    extractors::{AuthUser, require_owner},
    middleware::AppState,
    response::ApiResponse,
};

/// The caller's restaurants with menu and review aggregates.
async fn list_restaurants(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<OwnerRestaurantRow>>> {
    require_owner(&user)?;

    let rows = state.restaurant_service.owner_overview(&user.id).await?;
    let count = rows.len() as u64;
    Ok(ApiResponse::ok(rows).with_count(count))
}

/// Register a new restaurant. Starts in pending status.
async fn create_restaurant(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRestaurantInput>,
) -> AppResult<ApiResponse<restaurant::Model>> {
    require_owner(&user)?;

    let restaurant = state
        .restaurant_service
        .create_for_owner(&user, input)
        .await?;
    Ok(ApiResponse::created(restaurant)
        .with_message("Restaurant submitted for approval"))
}

/// Update one of the caller's restaurants.
async fn update_restaurant(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateRestaurantInput>,
) -> AppResult<ApiResponse<restaurant::Model>> {
    require_owner(&user)?;

    let restaurant = state
        .restaurant_service
        .update_for_owner(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(restaurant).with_message("Restaurant updated"))
}

/// Soft-delete one of the caller's restaurants.
async fn delete_restaurant(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    require_owner(&user)?;

    state
        .restaurant_service
        .deactivate_for_owner(&user.id, &id)
        .await?;
    Ok(ApiResponse::ok(()).with_message("Restaurant deactivated"))
}

/// Menu of one of the caller's restaurants.
async fn list_dishes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<dish::Model>>> {
    require_owner(&user)?;

    let dishes = state.dish_service.list_for_owner(&user.id, &id).await?;
    let count = dishes.len() as u64;
    Ok(ApiResponse::ok(dishes).with_count(count))
}

/// Add a dish to one of the caller's restaurants.
async fn create_dish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateDishInput>,
) -> AppResult<ApiResponse<dish::Model>> {
    require_owner(&user)?;

    let dish = state
        .dish_service
        .create_for_owner(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::created(dish).with_message("Dish added"))
}

/// Update a dish. Ownership resolves through the dish's restaurant.
async fn update_dish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateDishInput>,
) -> AppResult<ApiResponse<dish::Model>> {
    require_owner(&user)?;

    let dish = state
        .dish_service
        .update_for_owner(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(dish).with_message("Dish updated"))
}

/// Remove a dish.
async fn delete_dish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    require_owner(&user)?;

    state.dish_service.delete_for_owner(&user.id, &id).await?;
    Ok(ApiResponse::ok(()).with_message("Dish removed"))
}

/// Posts across the caller's restaurants, newest first.
async fn list_posts(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PostOwnerRow>>> {
    require_owner(&user)?;

    let posts = state.post_service.list_for_owner(&user.id).await?;
    let count = posts.len() as u64;
    Ok(ApiResponse::ok(posts).with_count(count))
}

/// Publish a post to one of the caller's restaurants.
async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<post_entity::Model>> {
    require_owner(&user)?;

    let post = state.post_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(post).with_message("Post published"))
}

/// Analytics for one of the caller's restaurants.
async fn analytics(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<ApiResponse<RestaurantAnalytics>> {
    require_owner(&user)?;

    let analytics = state
        .restaurant_service
        .analytics(&user.id, &restaurant_id)
        .await?;
    Ok(ApiResponse::ok(analytics))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants).post(create_restaurant))
        .route(
            "/restaurants/{id}",
            put(update_restaurant).delete(delete_restaurant),
        )
        .route(
            "/restaurants/{id}/dishes",
            get(list_dishes).post(create_dish),
        )
        .route("/dishes/{id}", put(update_dish).delete(delete_dish))
        .route("/posts", get(list_posts).post(create_post))
        .route("/analytics/{restaurant_id}", get(analytics))
}
