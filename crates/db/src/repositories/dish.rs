//! Dish repository.

use std::sync::Arc;

use crate::entities::{Dish, dish};
use dishcovery_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, Statement, Value,
};

/// Columns selected when hydrating dish models from raw SQL.
const DISH_COLUMNS: &str = "d.id, d.restaurant_id, d.name, d.description, d.price, d.category, \
     d.is_vegetarian, d.is_spicy, d.is_available, d.image_url, d.calories, \
     d.preparation_time, d.tags, d.created_at, d.updated_at";

/// Dish search result row with restaurant context.
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct DishSearchRow {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub restaurant_name: String,
    pub cuisine: Option<String>,
    pub restaurant_rating: f64,
}

/// Autocomplete suggestion row.
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct SuggestionRow {
    /// Suggested text.
    pub text: String,
    /// Where the suggestion came from: `dish` or `restaurant`.
    pub kind: String,
}

/// Filters for dish search.
#[derive(Debug, Clone, Default)]
pub struct DishSearchFilter {
    pub query: String,
    pub cuisine: Option<String>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

/// Dish repository for database operations.
#[derive(Clone)]
pub struct DishRepository {
    db: Arc<DatabaseConnection>,
}

impl DishRepository {
    /// Create a new dish repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a dish by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<dish::Model>> {
        Dish::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a dish by ID, failing if it does not exist.
    pub async fn get_by_id(&self, id: &str) -> AppResult<dish::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DishNotFound(id.to_string()))
    }

    /// Create a new dish.
    pub async fn create(&self, model: dish::ActiveModel) -> AppResult<dish::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply an update.
    pub async fn update(&self, model: dish::ActiveModel) -> AppResult<dish::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a dish by ID.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<bool> {
        let result = Dish::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Menu of a restaurant, grouped the way the dashboard renders it.
    pub async fn find_by_restaurant(&self, restaurant_id: &str) -> AppResult<Vec<dish::Model>> {
        Dish::find()
            .filter(dish::Column::RestaurantId.eq(restaurant_id))
            .order_by_asc(dish::Column::Category)
            .order_by_asc(dish::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Available dishes of a restaurant.
    pub async fn find_available_by_restaurant(
        &self,
        restaurant_id: &str,
        limit: u64,
    ) -> AppResult<Vec<dish::Model>> {
        use sea_orm::QuerySelect;

        Dish::find()
            .filter(dish::Column::RestaurantId.eq(restaurant_id))
            .filter(dish::Column::IsAvailable.eq(true))
            .order_by_desc(dish::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count dishes of a restaurant.
    pub async fn count_for_restaurant(&self, restaurant_id: &str) -> AppResult<u64> {
        use sea_orm::PaginatorTrait;

        Dish::find()
            .filter(dish::Column::RestaurantId.eq(restaurant_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a dish only if the given user manages its restaurant.
    pub async fn find_owned(
        &self,
        dish_id: &str,
        user_id: &str,
    ) -> AppResult<Option<dish::Model>> {
        let sql = format!(
            "SELECT {DISH_COLUMNS} FROM dish d \
             INNER JOIN restaurant_owner ro ON ro.restaurant_id = d.restaurant_id \
             WHERE d.id = ? AND ro.user_id = ?"
        );

        Dish::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::MySql,
                &sql,
                [dish_id.into(), user_id.into()],
            ))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Search dishes across approved restaurants.
    pub async fn search(&self, filter: &DishSearchFilter) -> AppResult<Vec<DishSearchRow>> {
        let (where_clause, mut values) = search_conditions(filter);

        let sql = format!(
            "SELECT d.id, d.restaurant_id, d.name, d.description, \
             CAST(d.price AS DOUBLE) AS price, d.category, d.image_url, \
             r.name AS restaurant_name, r.cuisine, \
             CAST(IFNULL((SELECT AVG(rv.rating) FROM review rv \
                 WHERE rv.restaurant_id = r.id), 0) AS DOUBLE) AS restaurant_rating \
             FROM dish d \
             INNER JOIN restaurant r ON r.id = d.restaurant_id \
             WHERE {where_clause} \
             ORDER BY d.name ASC \
             LIMIT ? OFFSET ?"
        );
        values.push(filter.limit.into());
        values.push(filter.offset.into());

        DishSearchRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            &sql,
            values,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Total number of rows the search would match without pagination.
    pub async fn count_search(&self, filter: &DishSearchFilter) -> AppResult<u64> {
        let (where_clause, values) = search_conditions(filter);

        let sql = format!(
            "SELECT COUNT(*) AS total FROM dish d \
             INNER JOIN restaurant r ON r.id = d.restaurant_id \
             WHERE {where_clause}"
        );

        let row = CountRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            &sql,
            values,
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map_or(0, |r| r.total.max(0) as u64))
    }

    /// Name-prefix suggestions across dishes and restaurants.
    pub async fn find_suggestions(
        &self,
        query: &str,
        limit: u64,
    ) -> AppResult<Vec<SuggestionRow>> {
        let prefix = format!(
            "{}%",
            query.replace('%', "\\%").replace('_', "\\_")
        );

        let sql = "SELECT d.name AS text, 'dish' AS kind FROM dish d \
             INNER JOIN restaurant r ON r.id = d.restaurant_id \
             WHERE r.status = 'approved' AND r.is_active = TRUE AND d.name LIKE ? \
             GROUP BY d.name \
             UNION \
             SELECT r.name AS text, 'restaurant' AS kind FROM restaurant r \
             WHERE r.status = 'approved' AND r.is_active = TRUE AND r.name LIKE ? \
             LIMIT ?";

        SuggestionRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            sql,
            [prefix.clone().into(), prefix.into(), limit.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Shared WHERE clause for `search` and `count_search`.
fn search_conditions(filter: &DishSearchFilter) -> (String, Vec<Value>) {
    let pattern = format!(
        "%{}%",
        filter.query.replace('%', "\\%").replace('_', "\\_")
    );

    let mut clause = String::from(
        "r.status = 'approved' AND r.is_active = TRUE AND d.is_available = TRUE \
         AND (d.name LIKE ? OR d.description LIKE ?)",
    );
    let mut values: Vec<Value> = vec![pattern.clone().into(), pattern.into()];

    if let Some(cuisine) = &filter.cuisine {
        clause.push_str(" AND r.cuisine = ?");
        values.push(cuisine.clone().into());
    }
    if let Some(max_price) = filter.max_price {
        clause.push_str(" AND d.price <= ?");
        values.push(max_price.into());
    }
    if let Some(min_rating) = filter.min_rating {
        clause.push_str(
            " AND CAST(IFNULL((SELECT AVG(rv.rating) FROM review rv \
             WHERE rv.restaurant_id = r.id), 0) AS DOUBLE) >= ?",
        );
        values.push(min_rating.into());
    }

    (clause, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_dish(id: &str, name: &str) -> dish::Model {
        dish::Model {
            id: id.to_string(),
            restaurant_id: "r1".to_string(),
            name: name.to_string(),
            description: None,
            price: Decimal::new(1499, 2),
            category: Some("Pizza".to_string()),
            is_vegetarian: true,
            is_spicy: false,
            is_available: true,
            image_url: None,
            calories: None,
            preparation_time: None,
            tags: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_owned_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[create_test_dish("d1", "Margherita")]])
                .into_connection(),
        );

        let repo = DishRepository::new(db);
        let result = repo.find_owned("d1", "owner1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "Margherita");
    }

    #[tokio::test]
    async fn test_find_owned_absent_for_non_member() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<dish::Model>::new()])
                .into_connection(),
        );

        let repo = DishRepository::new(db);
        let result = repo.find_owned("d1", "stranger").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_search_maps_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![btreemap! {
                    "id" => Value::from("d1"),
                    "restaurant_id" => Value::from("r1"),
                    "name" => Value::from("Butter Chicken"),
                    "description" => Value::from(None::<String>),
                    "price" => Value::from(18.99f64),
                    "category" => Value::from("Curry"),
                    "image_url" => Value::from(None::<String>),
                    "restaurant_name" => Value::from("Spice Kingdom"),
                    "cuisine" => Value::from("Indian"),
                    "restaurant_rating" => Value::from(4.2f64),
                }]])
                .into_connection(),
        );

        let repo = DishRepository::new(db);
        let filter = DishSearchFilter {
            query: "butter".to_string(),
            limit: 20,
            ..Default::default()
        };
        let rows = repo.search(&filter).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].restaurant_name, "Spice Kingdom");
        assert_eq!(rows[0].price, 18.99);
    }

    #[test]
    fn test_search_conditions_builds_filters() {
        let filter = DishSearchFilter {
            query: "taco".to_string(),
            cuisine: Some("Mexican".to_string()),
            max_price: Some(15.0),
            min_rating: Some(4.0),
            limit: 20,
            offset: 0,
        };

        let (clause, values) = search_conditions(&filter);

        assert!(clause.contains("d.name LIKE ?"));
        assert!(clause.contains("r.cuisine = ?"));
        assert!(clause.contains("d.price <= ?"));
        assert!(clause.contains(">= ?"));
        assert_eq!(values.len(), 5);
    }
}
