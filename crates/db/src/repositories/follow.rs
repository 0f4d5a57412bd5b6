//! Follow repository.
//!
//! Covers both restaurant follows (used by the personalized feed) and
//! user-to-user follows.

use std::sync::Arc;

use crate::entities::{RestaurantFollow, UserFollow, restaurant_follow, user_follow};
use dishcovery_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // === Restaurant follows ===

    /// Find a restaurant follow by pair.
    pub async fn find_restaurant_follow(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> AppResult<Option<restaurant_follow::Model>> {
        RestaurantFollow::find()
            .filter(restaurant_follow::Column::UserId.eq(user_id))
            .filter(restaurant_follow::Column::RestaurantId.eq(restaurant_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether the user follows the restaurant.
    pub async fn is_following_restaurant(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> AppResult<bool> {
        Ok(self
            .find_restaurant_follow(user_id, restaurant_id)
            .await?
            .is_some())
    }

    /// Create a restaurant follow.
    pub async fn create_restaurant_follow(
        &self,
        model: restaurant_follow::ActiveModel,
    ) -> AppResult<restaurant_follow::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a restaurant follow. Returns whether a row was removed.
    pub async fn delete_restaurant_follow(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> AppResult<bool> {
        let result = RestaurantFollow::delete_many()
            .filter(restaurant_follow::Column::UserId.eq(user_id))
            .filter(restaurant_follow::Column::RestaurantId.eq(restaurant_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Count followers of a restaurant.
    pub async fn count_restaurant_followers(&self, restaurant_id: &str) -> AppResult<u64> {
        RestaurantFollow::find()
            .filter(restaurant_follow::Column::RestaurantId.eq(restaurant_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // === User follows ===

    /// Find a user follow by pair.
    pub async fn find_user_follow(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<Option<user_follow::Model>> {
        UserFollow::find()
            .filter(user_follow::Column::FollowerId.eq(follower_id))
            .filter(user_follow::Column::FolloweeId.eq(followee_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a user follows another user.
    pub async fn is_following_user(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<bool> {
        Ok(self
            .find_user_follow(follower_id, followee_id)
            .await?
            .is_some())
    }

    /// Create a user follow.
    pub async fn create_user_follow(
        &self,
        model: user_follow::ActiveModel,
    ) -> AppResult<user_follow::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a user follow. Returns whether a row was removed.
    pub async fn delete_user_follow(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<bool> {
        let result = UserFollow::delete_many()
            .filter(user_follow::Column::FollowerId.eq(follower_id))
            .filter(user_follow::Column::FolloweeId.eq(followee_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Count followers of a user.
    pub async fn count_user_followers(&self, user_id: &str) -> AppResult<u64> {
        UserFollow::find()
            .filter(user_follow::Column::FolloweeId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users a user follows.
    pub async fn count_user_following(&self, user_id: &str) -> AppResult<u64> {
        UserFollow::find()
            .filter(user_follow::Column::FollowerId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
