//! Restaurant ownership repository.

use std::sync::Arc;

use crate::entities::{RestaurantOwner, restaurant_owner};
use dishcovery_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

/// Repository for the restaurant staff join table.
#[derive(Clone)]
pub struct RestaurantOwnerRepository {
    db: Arc<DatabaseConnection>,
}

impl RestaurantOwnerRepository {
    /// Create a new restaurant ownership repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a membership row for the given user and restaurant.
    pub async fn find_pair(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> AppResult<Option<restaurant_owner::Model>> {
        RestaurantOwner::find()
            .filter(restaurant_owner::Column::UserId.eq(user_id))
            .filter(restaurant_owner::Column::RestaurantId.eq(restaurant_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether the user manages the restaurant in any staff role.
    pub async fn is_member(&self, user_id: &str, restaurant_id: &str) -> AppResult<bool> {
        Ok(self.find_pair(user_id, restaurant_id).await?.is_some())
    }

    /// Whether the user holds the `owner` staff role for the restaurant.
    pub async fn is_owner(&self, user_id: &str, restaurant_id: &str) -> AppResult<bool> {
        Ok(self
            .find_pair(user_id, restaurant_id)
            .await?
            .is_some_and(|m| m.role == restaurant_owner::OwnerRole::Owner))
    }

    /// Register a staff membership.
    pub async fn create(
        &self,
        model: restaurant_owner::ActiveModel,
    ) -> AppResult<restaurant_owner::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
