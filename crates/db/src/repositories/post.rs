//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use dishcovery_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, Statement,
};

/// Post row for the owner dashboard, with restaurant name and like count.
#[derive(Debug, Clone, FromQueryResult, serde::Serialize)]
pub struct PostOwnerRow {
    pub id: String,
    pub restaurant_id: String,
    pub user_id: String,
    pub kind: String,
    pub title: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub restaurant_name: String,
    pub like_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Posts across all restaurants the user manages, newest first.
    pub async fn find_for_owner(&self, user_id: &str) -> AppResult<Vec<PostOwnerRow>> {
        let sql = "SELECT p.id, p.restaurant_id, p.user_id, p.kind, p.title, p.content, \
             p.image_url, p.is_published, p.created_at, \
             r.name AS restaurant_name, \
             (SELECT COUNT(*) FROM post_like pl WHERE pl.post_id = p.id) AS like_count \
             FROM post p \
             INNER JOIN restaurant r ON r.id = p.restaurant_id \
             INNER JOIN restaurant_owner ro ON ro.restaurant_id = r.id \
             WHERE ro.user_id = ? \
             ORDER BY p.created_at DESC";

        PostOwnerRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            sql,
            [user_id.into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts of a restaurant.
    pub async fn count_for_restaurant(&self, restaurant_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::RestaurantId.eq(restaurant_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    #[tokio::test]
    async fn test_find_for_owner_maps_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![btreemap! {
                    "id" => Value::from("p1"),
                    "restaurant_id" => Value::from("r1"),
                    "user_id" => Value::from("u1"),
                    "kind" => Value::from("promotion"),
                    "title" => Value::from("Happy hour"),
                    "content" => Value::from("Half-price pizza 4-6pm"),
                    "image_url" => Value::from(None::<String>),
                    "is_published" => Value::from(true),
                    "restaurant_name" => Value::from("Mama Mia"),
                    "like_count" => Value::from(7i64),
                    "created_at" => Value::from(chrono::Utc::now()),
                }]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let rows = repo.find_for_owner("u1").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "promotion");
        assert_eq!(rows[0].like_count, 7);
    }

    #[tokio::test]
    async fn test_find_for_owner_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let rows = repo.find_for_owner("u1").await.unwrap();

        assert!(rows.is_empty());
    }
}
