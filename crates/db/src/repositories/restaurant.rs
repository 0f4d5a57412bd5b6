//! Restaurant repository.
//!
//! Listing and feed queries join against `review` for the aggregate rating
//! and review count every restaurant summary carries.

use std::sync::Arc;

use crate::entities::{Restaurant, restaurant};
use dishcovery_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Statement, Value,
};

/// Columns shared by every aggregate restaurant summary.
const SUMMARY_COLUMNS: &str = "r.id, r.name, r.cuisine, r.location, r.price_range, r.image_url, \
     CAST(IFNULL(AVG(rev.rating), 0) AS DOUBLE) AS avg_rating, \
     COUNT(rev.id) AS review_count";

/// Restaurant summary used by the personalized feed and top-rated listings.
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct FeedRestaurantRow {
    pub id: String,
    pub name: String,
    pub cuisine: Option<String>,
    pub location: Option<String>,
    pub price_range: i32,
    pub image_url: Option<String>,
    pub avg_rating: f64,
    pub review_count: i64,
}

/// Restaurant row for public listings, including rating aggregates.
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct PublicRestaurantRow {
    pub id: String,
    pub name: String,
    pub cuisine: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub price_range: i32,
    pub image_url: Option<String>,
    pub status: String,
    pub avg_rating: f64,
    pub review_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Restaurant row for the owner dashboard.
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct OwnerRestaurantRow {
    pub id: String,
    pub name: String,
    pub cuisine: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub price_range: i32,
    pub status: String,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub dish_count: i64,
    pub review_count: i64,
    pub avg_rating: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Restaurant row for the admin moderation listing.
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct ModerationRow {
    pub id: String,
    pub name: String,
    pub cuisine: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub owner_id: Option<String>,
    pub owner_name: Option<String>,
    pub dish_count: i64,
    pub review_count: i64,
    pub avg_rating: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, FromQueryResult)]
struct CuisineRow {
    cuisine: String,
}

/// Filter for the public restaurant listing.
#[derive(Debug, Clone, Default)]
pub struct PublicRestaurantFilter {
    /// Include non-approved and inactive restaurants.
    pub include_all: bool,
    /// Exact cuisine match.
    pub cuisine: Option<String>,
    /// Substring match on name/description.
    pub search: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// Restaurant repository for database operations.
#[derive(Clone)]
pub struct RestaurantRepository {
    db: Arc<DatabaseConnection>,
}

impl RestaurantRepository {
    /// Create a new restaurant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a restaurant by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<restaurant::Model>> {
        Restaurant::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a restaurant by ID, failing if it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<restaurant::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RestaurantNotFound(id.to_string()))
    }

    /// Find a restaurant by exact name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<restaurant::Model>> {
        Restaurant::find()
            .filter(restaurant::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new restaurant.
    pub async fn create(&self, model: restaurant::ActiveModel) -> AppResult<restaurant::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply an update.
    pub async fn update(&self, model: restaurant::ActiveModel) -> AppResult<restaurant::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a restaurant by ID. Returns whether a row was removed.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<bool> {
        let result = Restaurant::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Public listing with rating aggregates.
    pub async fn find_public(
        &self,
        filter: &PublicRestaurantFilter,
    ) -> AppResult<Vec<PublicRestaurantRow>> {
        let mut sql = format!(
            "SELECT r.id, r.name, r.cuisine, r.location, r.address, r.description, \
             r.price_range, r.image_url, r.status, r.created_at, \
             CAST(IFNULL(AVG(rev.rating), 0) AS DOUBLE) AS avg_rating, \
             COUNT(rev.id) AS review_count \
             FROM restaurant r \
             LEFT JOIN review rev ON rev.restaurant_id = r.id \
             WHERE {}",
            public_visibility_clause(filter.include_all)
        );
        let mut values: Vec<Value> = Vec::new();

        if let Some(cuisine) = &filter.cuisine {
            sql.push_str(" AND r.cuisine = ?");
            values.push(cuisine.clone().into());
        }

        if let Some(search) = &filter.search {
            let pattern = like_pattern(search);
            sql.push_str(" AND (r.name LIKE ? OR r.description LIKE ?)");
            values.push(pattern.clone().into());
            values.push(pattern.into());
        }

        sql.push_str(" GROUP BY r.id ORDER BY r.created_at DESC LIMIT ? OFFSET ?");
        values.push(filter.limit.into());
        values.push(filter.offset.into());

        PublicRestaurantRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            &sql,
            values,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count rows matching the public listing filter.
    pub async fn count_public(&self, filter: &PublicRestaurantFilter) -> AppResult<u64> {
        let mut query = Restaurant::find();

        if !filter.include_all {
            query = query
                .filter(restaurant::Column::Status.eq(restaurant::Status::Approved))
                .filter(restaurant::Column::IsActive.eq(true));
        }
        if let Some(cuisine) = &filter.cuisine {
            query = query.filter(restaurant::Column::Cuisine.eq(cuisine));
        }
        if let Some(search) = &filter.search {
            let pattern = like_pattern(search);
            query = query.filter(
                restaurant::Column::Name
                    .like(&pattern)
                    .or(restaurant::Column::Description.like(&pattern)),
            );
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Restaurants the user follows, most recently followed first.
    pub async fn find_followed_feed(
        &self,
        user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<FeedRestaurantRow>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} \
             FROM restaurant_follow f \
             INNER JOIN restaurant r ON r.id = f.restaurant_id \
             LEFT JOIN review rev ON rev.restaurant_id = r.id \
             WHERE f.user_id = ? AND r.status = 'approved' AND r.is_active = TRUE \
             GROUP BY r.id, f.created_at \
             ORDER BY f.created_at DESC \
             LIMIT ?"
        );

        FeedRestaurantRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            &sql,
            [user_id.into(), limit.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Approved restaurants sharing a cuisine with restaurants the user rated
    /// highly, excluding restaurants the user already follows.
    ///
    /// A user with no reviews matches no cuisines and gets an empty result,
    /// not an error.
    pub async fn find_recommended_feed(
        &self,
        user_id: &str,
        min_rating: i32,
        limit: u64,
    ) -> AppResult<Vec<FeedRestaurantRow>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} \
             FROM restaurant r \
             LEFT JOIN review rev ON rev.restaurant_id = r.id \
             WHERE r.status = 'approved' AND r.is_active = TRUE \
             AND r.cuisine IS NOT NULL \
             AND r.cuisine IN ( \
                 SELECT DISTINCT r2.cuisine FROM review liked \
                 INNER JOIN restaurant r2 ON r2.id = liked.restaurant_id \
                 WHERE liked.user_id = ? AND liked.rating >= ? AND r2.cuisine IS NOT NULL \
             ) \
             AND r.id NOT IN (SELECT restaurant_id FROM restaurant_follow WHERE user_id = ?) \
             GROUP BY r.id \
             ORDER BY avg_rating DESC, review_count DESC \
             LIMIT ?"
        );

        FeedRestaurantRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            &sql,
            [
                user_id.into(),
                min_rating.into(),
                user_id.into(),
                limit.into(),
            ],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Approved restaurants with at least one review since `since`, excluding
    /// restaurants the user already follows.
    pub async fn find_trending_feed(
        &self,
        user_id: &str,
        since: chrono::DateTime<chrono::Utc>,
        limit: u64,
    ) -> AppResult<Vec<FeedRestaurantRow>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} \
             FROM restaurant r \
             LEFT JOIN review rev ON rev.restaurant_id = r.id \
             WHERE r.status = 'approved' AND r.is_active = TRUE \
             AND EXISTS ( \
                 SELECT 1 FROM review recent \
                 WHERE recent.restaurant_id = r.id AND recent.created_at >= ? \
             ) \
             AND r.id NOT IN (SELECT restaurant_id FROM restaurant_follow WHERE user_id = ?) \
             GROUP BY r.id \
             ORDER BY avg_rating DESC, review_count DESC \
             LIMIT ?"
        );

        FeedRestaurantRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            &sql,
            [since.into(), user_id.into(), limit.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Highest rated approved restaurants.
    pub async fn find_top_rated(&self, limit: u64) -> AppResult<Vec<FeedRestaurantRow>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} \
             FROM restaurant r \
             LEFT JOIN review rev ON rev.restaurant_id = r.id \
             WHERE r.status = 'approved' AND r.is_active = TRUE \
             GROUP BY r.id \
             ORDER BY avg_rating DESC, review_count DESC \
             LIMIT ?"
        );

        FeedRestaurantRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            &sql,
            [limit.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Distinct non-empty cuisines.
    pub async fn find_distinct_cuisines(&self, limit: u64) -> AppResult<Vec<String>> {
        let rows = CuisineRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            "SELECT DISTINCT cuisine FROM restaurant \
             WHERE cuisine IS NOT NULL AND cuisine != '' LIMIT ?",
            [limit.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.cuisine).collect())
    }

    /// Restaurants created by the given owner, with menu/review aggregates.
    pub async fn find_by_owner_with_stats(
        &self,
        owner_id: &str,
    ) -> AppResult<Vec<OwnerRestaurantRow>> {
        let sql = "SELECT r.id, r.name, r.cuisine, r.location, r.description, r.price_range, \
             r.status, r.is_active, r.image_url, r.created_at, \
             COUNT(DISTINCT d.id) AS dish_count, \
             COUNT(DISTINCT rev.id) AS review_count, \
             CAST(IFNULL(AVG(rev.rating), 0) AS DOUBLE) AS avg_rating \
             FROM restaurant r \
             LEFT JOIN dish d ON d.restaurant_id = r.id \
             LEFT JOIN review rev ON rev.restaurant_id = r.id \
             WHERE r.owner_id = ? \
             GROUP BY r.id \
             ORDER BY r.created_at DESC";

        OwnerRestaurantRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            sql,
            [owner_id.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Plain listing of restaurants created by the given owner.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<restaurant::Model>> {
        Restaurant::find()
            .filter(restaurant::Column::OwnerId.eq(owner_id))
            .order_by_desc(restaurant::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Moderation listing with owner names and aggregates, newest first.
    pub async fn find_moderation(
        &self,
        status: Option<restaurant::Status>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ModerationRow>> {
        let mut sql = String::from(
            "SELECT r.id, r.name, r.cuisine, r.location, r.status, r.owner_id, r.created_at, \
             u.name AS owner_name, \
             COUNT(DISTINCT d.id) AS dish_count, \
             COUNT(DISTINCT rev.id) AS review_count, \
             CAST(IFNULL(AVG(rev.rating), 0) AS DOUBLE) AS avg_rating \
             FROM restaurant r \
             LEFT JOIN user u ON u.id = r.owner_id \
             LEFT JOIN dish d ON d.restaurant_id = r.id \
             LEFT JOIN review rev ON rev.restaurant_id = r.id",
        );
        let mut values: Vec<Value> = Vec::new();

        if let Some(status) = status {
            sql.push_str(" WHERE r.status = ?");
            values.push(status.as_str().into());
        }

        sql.push_str(" GROUP BY r.id, u.name ORDER BY r.created_at DESC LIMIT ? OFFSET ?");
        values.push(limit.into());
        values.push(offset.into());

        ModerationRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            &sql,
            values,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count restaurants, optionally restricted to a status.
    pub async fn count_by_status(
        &self,
        status: Option<restaurant::Status>,
    ) -> AppResult<u64> {
        let mut query = Restaurant::find();
        if let Some(status) = status {
            query = query.filter(restaurant::Column::Status.eq(status));
        }
        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Oldest pending restaurants awaiting moderation.
    pub async fn find_pending(&self, limit: u64) -> AppResult<Vec<restaurant::Model>> {
        Restaurant::find()
            .filter(restaurant::Column::Status.eq(restaurant::Status::Pending))
            .order_by_asc(restaurant::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn public_visibility_clause(include_all: bool) -> &'static str {
    if include_all {
        "1 = 1"
    } else {
        "r.status = 'approved' AND r.is_active = TRUE"
    }
}

/// Escape LIKE wildcards in user input and wrap in `%`.
fn like_pattern(input: &str) -> String {
    format!("%{}%", input.replace('%', "\\%").replace('_', "\\_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_restaurant(id: &str, name: &str) -> restaurant::Model {
        restaurant::Model {
            id: id.to_string(),
            name: name.to_string(),
            cuisine: Some("Italian".to_string()),
            location: Some("Little Italy".to_string()),
            address: None,
            description: None,
            price_range: 3,
            owner_id: Some("owner1".to_string()),
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

    #[tokio::test]
    async fn test_find_by_id_found() {
        let existing = create_test_restaurant("r1", "Mama Mia");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[existing.clone()]])
                .into_connection(),
        );

        let repo = RestaurantRepository::new(db);
        let result = repo.find_by_id("r1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "Mama Mia");
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<restaurant::Model>::new()])
                .into_connection(),
        );

        let repo = RestaurantRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::RestaurantNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_followed_feed_maps_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![btreemap! {
                    "id" => Value::from("r1"),
                    "name" => Value::from("Mama Mia"),
                    "cuisine" => Value::from("Italian"),
                    "location" => Value::from("Little Italy"),
                    "price_range" => Value::from(3i32),
                    "image_url" => Value::from(None::<String>),
                    "avg_rating" => Value::from(4.5f64),
                    "review_count" => Value::from(12i64),
                }]])
                .into_connection(),
        );

        let repo = RestaurantRepository::new(db);
        let rows = repo.find_followed_feed("u1", 50).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "r1");
        assert_eq!(rows[0].avg_rating, 4.5);
        assert_eq!(rows[0].review_count, 12);
    }

    #[tokio::test]
    async fn test_find_recommended_feed_empty_for_no_matches() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );

        let repo = RestaurantRepository::new(db);
        let rows = repo.find_recommended_feed("u1", 4, 30).await.unwrap();

        assert!(rows.is_empty());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
