//! Review service.

use chrono::Utc;
use dishcovery_common::{AppError, AppResult, IdGenerator};
use dishcovery_db::{
    entities::{review, user},
    repositories::{RestaurantRepository, ReviewRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Review service for business logic.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    restaurant_repo: RestaurantRepository,
    id_gen: IdGenerator,
}

/// Input for creating a review.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewInput {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub fn new(review_repo: ReviewRepository, restaurant_repo: RestaurantRepository) -> Self {
        Self {
            review_repo,
            restaurant_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a review to a restaurant.
    ///
    /// One review per user per restaurant; a second attempt is a conflict.
    pub async fn add(
        &self,
        author: &user::Model,
        restaurant_id: &str,
        input: CreateReviewInput,
    ) -> AppResult<review::Model> {
        input.validate()?;

        // 404 before 409: the restaurant must exist
        self.restaurant_repo.get_by_id(restaurant_id).await?;

        if self
            .review_repo
            .exists_for(&author.id, restaurant_id)
            .await?
        {
            return Err(AppError::Conflict(
                "You have already reviewed this restaurant".to_string(),
            ));
        }

        let model = review::ActiveModel {
            id: Set(self.id_gen.generate()),
            restaurant_id: Set(restaurant_id.to_string()),
            user_id: Set(author.id.clone()),
            user_name: Set(author.name.clone()),
            rating: Set(input.rating),
            comment: Set(input.comment),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        self.review_repo.create(model).await
    }

    /// Reviews of a restaurant, newest first.
    pub async fn list_for_restaurant(
        &self,
        restaurant_id: &str,
    ) -> AppResult<Vec<review::Model>> {
        self.restaurant_repo.get_by_id(restaurant_id).await?;
        self.review_repo.find_by_restaurant(restaurant_id).await
    }
}
