//! Post service.
//!
//! Posts are restaurant updates published by owners: menu changes, events,
//! promotions. The owner dashboard lists them across all of the caller's
//! restaurants with like counts.

use chrono::Utc;
use dishcovery_common::{AppError, AppResult, IdGenerator};
use dishcovery_db::{
    entities::post,
    repositories::{PostOwnerRow, PostRepository, RestaurantOwnerRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    owner_repo: RestaurantOwnerRepository,
    id_gen: IdGenerator,
}

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    pub restaurant_id: String,

    /// Post kind: `menu_update`, `announcement`, `event`, `promotion` or
    /// `story`.
    pub kind: String,

    #[validate(length(max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub content: String,

    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(post_repo: PostRepository, owner_repo: RestaurantOwnerRepository) -> Self {
        Self {
            post_repo,
            owner_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Posts across all restaurants the user manages, newest first.
    pub async fn list_for_owner(&self, user_id: &str) -> AppResult<Vec<PostOwnerRow>> {
        self.post_repo.find_for_owner(user_id).await
    }

    /// Publish a post to a restaurant the user manages.
    pub async fn create(&self, user_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let kind = post::Kind::parse(&input.kind).ok_or_else(|| {
            AppError::Validation(
                "Kind must be menu_update, announcement, event, promotion, or story".to_string(),
            )
        })?;

        if !self
            .owner_repo
            .is_member(user_id, &input.restaurant_id)
            .await?
        {
            return Err(AppError::Forbidden(
                "You do not have permission to post for this restaurant".to_string(),
            ));
        }

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            restaurant_id: Set(input.restaurant_id),
            user_id: Set(user_id.to_string()),
            kind: Set(kind),
            title: Set(input.title),
            content: Set(input.content),
            image_url: Set(input.image_url),
            is_published: Set(input.is_published.unwrap_or(true)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        self.post_repo.create(model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishcovery_db::entities::restaurant_owner;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> PostService {
        let db = Arc::new(db);
        PostService::new(
            PostRepository::new(Arc::clone(&db)),
            RestaurantOwnerRepository::new(db),
        )
    }

    fn valid_input() -> CreatePostInput {
        CreatePostInput {
            restaurant_id: "r1".to_string(),
            kind: "promotion".to_string(),
            title: Some("Happy hour".to_string()),
            content: "Half-price pizza 4-6pm".to_string(),
            image_url: None,
            is_published: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_kind() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let mut input = valid_input();
        input.kind = "rant".to_string();

        let result = service.create("owner1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_content() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let mut input = valid_input();
        input.content = String::new();

        let result = service.create("owner1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_forbidden_for_non_member() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<restaurant_owner::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service.create("stranger", valid_input()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
