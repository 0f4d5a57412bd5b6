//! Follow service.
//!
//! Restaurant follows feed the personalized feed; user follows exist for the
//! social profile pages. A duplicate follow is a conflict, unfollowing
//! something never followed a 404.

use chrono::Utc;
use dishcovery_common::{AppError, AppResult};
use dishcovery_db::{
    entities::{restaurant_follow, user_follow},
    repositories::{FollowRepository, RestaurantRepository, UserRepository},
};
use sea_orm::Set;

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    restaurant_repo: RestaurantRepository,
    user_repo: UserRepository,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(
        follow_repo: FollowRepository,
        restaurant_repo: RestaurantRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            follow_repo,
            restaurant_repo,
            user_repo,
        }
    }

    /// Follow a restaurant.
    pub async fn follow_restaurant(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> AppResult<restaurant_follow::Model> {
        self.restaurant_repo.get_by_id(restaurant_id).await?;

        if self
            .follow_repo
            .is_following_restaurant(user_id, restaurant_id)
            .await?
        {
            return Err(AppError::Conflict(
                "You are already following this restaurant".to_string(),
            ));
        }

        let model = restaurant_follow::ActiveModel {
            user_id: Set(user_id.to_string()),
            restaurant_id: Set(restaurant_id.to_string()),
            notifications: Set(true),
            created_at: Set(Utc::now()),
        };

        self.follow_repo.create_restaurant_follow(model).await
    }

    /// Stop following a restaurant.
    pub async fn unfollow_restaurant(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> AppResult<()> {
        let removed = self
            .follow_repo
            .delete_restaurant_follow(user_id, restaurant_id)
            .await?;

        if !removed {
            return Err(AppError::NotFound("Follow".to_string()));
        }
        Ok(())
    }

    /// Whether the user follows the restaurant.
    pub async fn is_following_restaurant(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> AppResult<bool> {
        self.follow_repo
            .is_following_restaurant(user_id, restaurant_id)
            .await
    }

    /// Follow another user.
    pub async fn follow_user(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<user_follow::Model> {
        if follower_id == followee_id {
            return Err(AppError::BadRequest(
                "You cannot follow yourself".to_string(),
            ));
        }

        self.user_repo.get_by_id(followee_id).await?;

        if self
            .follow_repo
            .is_following_user(follower_id, followee_id)
            .await?
        {
            return Err(AppError::Conflict(
                "You are already following this user".to_string(),
            ));
        }

        let model = user_follow::ActiveModel {
            follower_id: Set(follower_id.to_string()),
            followee_id: Set(followee_id.to_string()),
            created_at: Set(Utc::now()),
        };

        self.follow_repo.create_user_follow(model).await
    }

    /// Stop following a user.
    pub async fn unfollow_user(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        let removed = self
            .follow_repo
            .delete_user_follow(follower_id, followee_id)
            .await?;

        if !removed {
            return Err(AppError::NotFound("Follow".to_string()));
        }
        Ok(())
    }

    /// Follower/following counts for a user profile.
    pub async fn user_follow_counts(&self, user_id: &str) -> AppResult<(u64, u64)> {
        let followers = self.follow_repo.count_user_followers(user_id).await?;
        let following = self.follow_repo.count_user_following(user_id).await?;
        Ok((followers, following))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishcovery_db::entities::restaurant;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> FollowService {
        let db = Arc::new(db);
        FollowService::new(
            FollowRepository::new(Arc::clone(&db)),
            RestaurantRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        )
    }

    fn test_restaurant() -> restaurant::Model {
        restaurant::Model {
            id: "r1".to_string(),
            name: "Mama Mia".to_string(),
            cuisine: Some("Italian".to_string()),
            location: None,
            address: None,
            description: None,
            price_range: 3,
            owner_id: None,
            status: restaurant::Status::Approved,
            is_active: true,
            contact_phone: None,
            contact_email: None,
            website: None,
            opening_hours: None,
            social_links: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn existing_follow() -> restaurant_follow::Model {
        restaurant_follow::Model {
            user_id: "u1".to_string(),
            restaurant_id: "r1".to_string(),
            notifications: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_follow_unknown_restaurant_is_404() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<restaurant::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service.follow_restaurant("u1", "missing").await;
        assert!(matches!(result, Err(AppError::RestaurantNotFound(_))));
    }

    #[tokio::test]
    async fn test_second_follow_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[test_restaurant()]])
            .append_query_results([[existing_follow()]])
            .into_connection();
        let service = service_with(db);

        let result = service.follow_restaurant("u1", "r1").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unfollow_when_not_following_is_404() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let service = service_with(db);

        let result = service.unfollow_restaurant("u1", "r1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_follow_self_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let result = service.follow_user("u1", "u1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
