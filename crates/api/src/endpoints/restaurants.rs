//! Public restaurant endpoints: listings, details, reviews, follows, the
//! personalized feed and dish search.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use dishcovery_common::{AppError, AppResult};
use dishcovery_core::{
    CreateReviewInput, DishSearchPage, DishSearchQuery, HomeStats, PersonalizedFeed,
    PublicListQuery,
};
use dishcovery_db::{
    entities::{dish, restaurant, restaurant_follow, review},
    repositories::{PublicRestaurantRow, SuggestionRow},
};
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Public listing. Only approved, active restaurants unless `includeAll`.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<PublicListQuery>,
) -> AppResult<ApiResponse<Vec<PublicRestaurantRow>>> {
    let (rows, total) = state.restaurant_service.list_public(&query).await?;
    Ok(ApiResponse::ok(rows).with_count(total))
}

/// Restaurant detail.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<restaurant::Model>> {
    let restaurant = state.restaurant_service.get(&id).await?;
    Ok(ApiResponse::ok(restaurant))
}

/// Menu of a restaurant.
async fn dishes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<dish::Model>>> {
    let dishes = state.dish_service.list_for_restaurant(&id).await?;
    let count = dishes.len() as u64;
    Ok(ApiResponse::ok(dishes).with_count(count))
}

/// Reviews of a restaurant, newest first.
async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<review::Model>>> {
    let reviews = state.review_service.list_for_restaurant(&id).await?;
    let count = reviews.len() as u64;
    Ok(ApiResponse::ok(reviews).with_count(count))
}

/// Add a review. One per user per restaurant.
async fn create_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateReviewInput>,
) -> AppResult<ApiResponse<review::Model>> {
    let review = state.review_service.add(&user, &id, input).await?;
    Ok(ApiResponse::created(review).with_message("Review added"))
}

/// Follow a restaurant.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<restaurant_follow::Model>> {
    let follow = state.follow_service.follow_restaurant(&user.id, &id).await?;
    Ok(ApiResponse::created(follow).with_message("Now following this restaurant"))
}

/// Stop following a restaurant.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .follow_service
        .unfollow_restaurant(&user.id, &id)
        .await?;
    Ok(ApiResponse::ok(()).with_message("Unfollowed"))
}

/// Home page statistics.
async fn home_stats(State(state): State<AppState>) -> AppResult<ApiResponse<HomeStats>> {
    let stats = state.restaurant_service.home_stats().await?;
    Ok(ApiResponse::ok(stats))
}

/// Query for the personalized feed.
#[derive(Debug, Deserialize)]
struct FeedQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

/// The personalized feed: followed, then recommended, then trending.
async fn personalized_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<ApiResponse<PersonalizedFeed>> {
    let user_id = query
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("userId is required".to_string()))?;

    let feed = state.feed_service.personalized(&user_id).await?;
    Ok(ApiResponse::ok(feed))
}

/// Dish search across approved restaurants.
async fn search_dishes(
    State(state): State<AppState>,
    Query(query): Query<DishSearchQuery>,
) -> AppResult<ApiResponse<DishSearchPage>> {
    let page = state.dish_service.search(&query).await?;
    Ok(ApiResponse::ok(page))
}

/// Query for name suggestions.
#[derive(Debug, Deserialize)]
struct SuggestionQuery {
    #[serde(default)]
    q: String,
}

/// Name-prefix suggestions across dishes and restaurants.
async fn search_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> AppResult<ApiResponse<Vec<SuggestionRow>>> {
    let suggestions = state.dish_service.suggestions(&query.q).await?;
    Ok(ApiResponse::ok(suggestions))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/stats/home", get(home_stats))
        .route("/feed/personalized", get(personalized_feed))
        .route("/search/dishes", get(search_dishes))
        .route("/search/suggestions", get(search_suggestions))
        .route("/{id}", get(show))
        .route("/{id}/dishes", get(dishes))
        .route("/{id}/reviews", get(reviews).post(create_review))
        .route("/{id}/follow", post(follow).delete(unfollow))
}
