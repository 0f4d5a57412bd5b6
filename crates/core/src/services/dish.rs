//! Dish service.
//!
//! Covers the owner-facing menu CRUD and the public dish search. Ownership
//! for update/delete is resolved through the dish's restaurant.

use chrono::Utc;
use dishcovery_common::{AppError, AppResult, IdGenerator};
use dishcovery_db::{
    entities::dish,
    repositories::{
        DishRepository, DishSearchFilter, DishSearchRow, RestaurantOwnerRepository,
        RestaurantRepository, SuggestionRow,
    },
};
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default page size for dish search.
const DEFAULT_SEARCH_LIMIT: u64 = 20;

/// Hard cap on the search page size.
const MAX_SEARCH_LIMIT: u64 = 100;

/// Cap on autocomplete suggestions.
const SUGGESTION_LIMIT: u64 = 10;

/// Dish service for business logic.
#[derive(Clone)]
pub struct DishService {
    dish_repo: DishRepository,
    restaurant_repo: RestaurantRepository,
    owner_repo: RestaurantOwnerRepository,
    id_gen: IdGenerator,
}

/// Input for creating a dish.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDishInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Price in the restaurant's currency. Required and non-negative.
    pub price: Decimal,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(max = 50))]
    pub category: Option<String>,

    pub is_vegetarian: Option<bool>,
    pub is_spicy: Option<bool>,
    pub is_available: Option<bool>,
    pub image_url: Option<String>,

    #[validate(range(min = 0))]
    pub calories: Option<i32>,

    /// Preparation time in minutes.
    #[validate(range(min = 0))]
    pub preparation_time: Option<i32>,

    pub tags: Option<serde_json::Value>,
}

/// Input for updating a dish. All fields optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDishInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub price: Option<Decimal>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(max = 50))]
    pub category: Option<String>,

    pub is_vegetarian: Option<bool>,
    pub is_spicy: Option<bool>,
    pub is_available: Option<bool>,
    pub image_url: Option<String>,

    #[validate(range(min = 0))]
    pub calories: Option<i32>,

    #[validate(range(min = 0))]
    pub preparation_time: Option<i32>,

    pub tags: Option<serde_json::Value>,
}

impl UpdateDishInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.is_vegetarian.is_none()
            && self.is_spicy.is_none()
            && self.is_available.is_none()
            && self.image_url.is_none()
            && self.calories.is_none()
            && self.preparation_time.is_none()
            && self.tags.is_none()
    }
}

/// Query for the public dish search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishSearchQuery {
    /// Search term, matched against name and description.
    pub q: Option<String>,
    pub cuisine: Option<String>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// A page of dish search results.
#[derive(Debug, Serialize)]
pub struct DishSearchPage {
    pub results: Vec<DishSearchRow>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl DishService {
    /// Create a new dish service.
    #[must_use]
    pub fn new(
        dish_repo: DishRepository,
        restaurant_repo: RestaurantRepository,
        owner_repo: RestaurantOwnerRepository,
    ) -> Self {
        Self {
            dish_repo,
            restaurant_repo,
            owner_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Menu of a restaurant. The restaurant must exist.
    pub async fn list_for_restaurant(&self, restaurant_id: &str) -> AppResult<Vec<dish::Model>> {
        self.restaurant_repo.get_by_id(restaurant_id).await?;
        self.dish_repo.find_by_restaurant(restaurant_id).await
    }

    /// Menu of a restaurant the user manages, for the owner dashboard.
    pub async fn list_for_owner(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> AppResult<Vec<dish::Model>> {
        if !self.owner_repo.is_member(user_id, restaurant_id).await? {
            return Err(AppError::Forbidden(
                "You do not have permission to view this menu".to_string(),
            ));
        }
        self.dish_repo.find_by_restaurant(restaurant_id).await
    }

    /// Add a dish to a restaurant the user manages.
    pub async fn create_for_owner(
        &self,
        user_id: &str,
        restaurant_id: &str,
        input: CreateDishInput,
    ) -> AppResult<dish::Model> {
        input.validate()?;

        if input.price < Decimal::ZERO {
            return Err(AppError::Validation(
                "Price must not be negative".to_string(),
            ));
        }

        if !self.owner_repo.is_member(user_id, restaurant_id).await? {
            return Err(AppError::Forbidden(
                "You do not have permission to manage this menu".to_string(),
            ));
        }
        self.restaurant_repo.get_by_id(restaurant_id).await?;

        let model = dish::ActiveModel {
            id: Set(self.id_gen.generate()),
            restaurant_id: Set(restaurant_id.to_string()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            price: Set(input.price),
            category: Set(input.category.map(|c| c.trim().to_string())),
            is_vegetarian: Set(input.is_vegetarian.unwrap_or(false)),
            is_spicy: Set(input.is_spicy.unwrap_or(false)),
            is_available: Set(input.is_available.unwrap_or(true)),
            image_url: Set(input.image_url),
            calories: Set(input.calories),
            preparation_time: Set(input.preparation_time),
            tags: Set(input.tags),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        self.dish_repo.create(model).await
    }

    /// Update a dish. Ownership is resolved through the dish's restaurant:
    /// a missing dish is a 404, a dish in someone else's restaurant a 403.
    pub async fn update_for_owner(
        &self,
        user_id: &str,
        dish_id: &str,
        input: UpdateDishInput,
    ) -> AppResult<dish::Model> {
        input.validate()?;

        if input.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }
        if let Some(price) = input.price
            && price < Decimal::ZERO
        {
            return Err(AppError::Validation(
                "Price must not be negative".to_string(),
            ));
        }

        let existing = self.resolve_owned(user_id, dish_id).await?;
        let mut active: dish::ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = input.category {
            active.category = Set(Some(category.trim().to_string()));
        }
        if let Some(is_vegetarian) = input.is_vegetarian {
            active.is_vegetarian = Set(is_vegetarian);
        }
        if let Some(is_spicy) = input.is_spicy {
            active.is_spicy = Set(is_spicy);
        }
        if let Some(is_available) = input.is_available {
            active.is_available = Set(is_available);
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(calories) = input.calories {
            active.calories = Set(Some(calories));
        }
        if let Some(preparation_time) = input.preparation_time {
            active.preparation_time = Set(Some(preparation_time));
        }
        if let Some(tags) = input.tags {
            active.tags = Set(Some(tags));
        }
        active.updated_at = Set(Some(Utc::now()));

        self.dish_repo.update(active).await
    }

    /// Remove a dish from a restaurant the user manages.
    pub async fn delete_for_owner(&self, user_id: &str, dish_id: &str) -> AppResult<()> {
        self.resolve_owned(user_id, dish_id).await?;
        self.dish_repo.delete_by_id(dish_id).await?;
        Ok(())
    }

    /// Search dishes across approved restaurants.
    pub async fn search(&self, query: &DishSearchQuery) -> AppResult<DishSearchPage> {
        let term = query.q.as_deref().unwrap_or("").trim().to_string();
        if term.is_empty() {
            return Err(AppError::BadRequest(
                "Search query is required".to_string(),
            ));
        }

        let limit = query
            .limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);
        let offset = query.offset.unwrap_or(0);

        let filter = DishSearchFilter {
            query: term,
            cuisine: query.cuisine.clone(),
            max_price: query.max_price,
            min_rating: query.min_rating,
            limit,
            offset,
        };

        let results = self.dish_repo.search(&filter).await?;
        let total = self.dish_repo.count_search(&filter).await?;

        Ok(DishSearchPage {
            results,
            total,
            page: offset / limit + 1,
            pages: total.div_ceil(limit),
        })
    }

    /// Name-prefix suggestions across dishes and restaurants.
    pub async fn suggestions(&self, q: &str) -> AppResult<Vec<SuggestionRow>> {
        let term = q.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        self.dish_repo.find_suggestions(term, SUGGESTION_LIMIT).await
    }

    /// Load a dish and fail unless the user manages its restaurant.
    async fn resolve_owned(&self, user_id: &str, dish_id: &str) -> AppResult<dish::Model> {
        let dish = self.dish_repo.get_by_id(dish_id).await?;

        if !self
            .owner_repo
            .is_member(user_id, &dish.restaurant_id)
            .await?
        {
            return Err(AppError::Forbidden(
                "You do not have permission to manage this dish".to_string(),
            ));
        }

        Ok(dish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishcovery_db::entities::restaurant_owner;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> DishService {
        let db = Arc::new(db);
        DishService::new(
            DishRepository::new(Arc::clone(&db)),
            RestaurantRepository::new(Arc::clone(&db)),
            RestaurantOwnerRepository::new(db),
        )
    }

    fn test_dish(id: &str, restaurant_id: &str) -> dish::Model {
        dish::Model {
            id: id.to_string(),
            restaurant_id: restaurant_id.to_string(),
            name: "Margherita".to_string(),
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

    fn valid_create_input() -> CreateDishInput {
        CreateDishInput {
            name: "Margherita".to_string(),
            price: Decimal::new(1499, 2),
            description: None,
            category: None,
            is_vegetarian: None,
            is_spicy: None,
            is_available: None,
            image_url: None,
            calories: None,
            preparation_time: None,
            tags: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let mut input = valid_create_input();
        input.name = String::new();

        let result = service.create_for_owner("owner1", "r1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_price() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let mut input = valid_create_input();
        input.price = Decimal::new(-100, 2);

        let result = service.create_for_owner("owner1", "r1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_forbidden_for_non_member() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<restaurant_owner::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service
            .create_for_owner("stranger", "r1", valid_create_input())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_missing_dish_is_404() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<dish::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let input = UpdateDishInput {
            name: Some("New Name".to_string()),
            ..Default::default()
        };

        let result = service.update_for_owner("owner1", "missing", input).await;
        assert!(matches!(result, Err(AppError::DishNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_foreign_dish_is_403() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[test_dish("d1", "r1")]])
            .append_query_results([Vec::<restaurant_owner::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let input = UpdateDishInput {
            name: Some("New Name".to_string()),
            ..Default::default()
        };

        let result = service.update_for_owner("stranger", "d1", input).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let result = service.search(&DishSearchQuery::default()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_suggestions_empty_query_yields_nothing() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let rows = service.suggestions("   ").await.unwrap();
        assert!(rows.is_empty());
    }
}
