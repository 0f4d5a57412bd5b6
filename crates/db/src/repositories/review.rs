//! Review repository.

use std::sync::Arc;

use crate::entities::{Review, review};
use dishcovery_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Statement,
};

/// Review row for the admin moderation listing.
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct ReviewModerationRow {
    pub id: String,
    pub restaurant_id: String,
    pub user_id: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub restaurant_name: Option<String>,
    pub user_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, FromQueryResult)]
struct AvgRow {
    value: f64,
}

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a review by ID. Returns whether a row was removed.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<bool> {
        let result = Review::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Whether the user has already reviewed the restaurant.
    pub async fn exists_for(&self, user_id: &str, restaurant_id: &str) -> AppResult<bool> {
        let found = Review::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::RestaurantId.eq(restaurant_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.is_some())
    }

    /// Reviews of a restaurant, newest first.
    pub async fn find_by_restaurant(&self, restaurant_id: &str) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::RestaurantId.eq(restaurant_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most recent reviews of a restaurant.
    pub async fn find_recent(
        &self,
        restaurant_id: &str,
        limit: u64,
    ) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::RestaurantId.eq(restaurant_id))
            .order_by_desc(review::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all reviews.
    pub async fn count_all(&self) -> AppResult<u64> {
        Review::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reviews of a restaurant.
    pub async fn count_for_restaurant(&self, restaurant_id: &str) -> AppResult<u64> {
        Review::find()
            .filter(review::Column::RestaurantId.eq(restaurant_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Average rating across all reviews, 0 when there are none.
    pub async fn average_rating(&self) -> AppResult<f64> {
        self.average_query(None).await
    }

    /// Average rating of a restaurant, 0 when there are none.
    pub async fn average_rating_for(&self, restaurant_id: &str) -> AppResult<f64> {
        self.average_query(Some(restaurant_id)).await
    }

    async fn average_query(&self, restaurant_id: Option<&str>) -> AppResult<f64> {
        let (sql, values) = match restaurant_id {
            Some(id) => (
                "SELECT CAST(IFNULL(AVG(rating), 0) AS DOUBLE) AS value \
                 FROM review WHERE restaurant_id = ?",
                vec![sea_orm::Value::from(id)],
            ),
            None => (
                "SELECT CAST(IFNULL(AVG(rating), 0) AS DOUBLE) AS value FROM review",
                Vec::new(),
            ),
        };

        let row = AvgRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            sql,
            values,
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map_or(0.0, |r| r.value))
    }

    /// Moderation listing with restaurant and user names, newest first.
    pub async fn find_moderation(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ReviewModerationRow>> {
        let sql = "SELECT rev.id, rev.restaurant_id, rev.user_id, rev.rating, rev.comment, \
             rev.created_at, r.name AS restaurant_name, u.name AS user_name \
             FROM review rev \
             LEFT JOIN restaurant r ON r.id = rev.restaurant_id \
             LEFT JOIN user u ON u.id = rev.user_id \
             ORDER BY rev.created_at DESC \
             LIMIT ? OFFSET ?";

        ReviewModerationRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            sql,
            [limit.into(), offset.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}
