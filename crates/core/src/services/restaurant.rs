//! Restaurant service.

use chrono::Utc;
use dishcovery_common::{AppError, AppResult, IdGenerator};
use dishcovery_db::{
    entities::{restaurant, restaurant_owner, user},
    repositories::{
        DishRepository, FeedRestaurantRow, FollowRepository, OwnerRestaurantRow, PostRepository,
        PublicRestaurantFilter, PublicRestaurantRow, RestaurantOwnerRepository,
        RestaurantRepository, ReviewRepository,
    },
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How many top restaurants the home page shows.
const HOME_TOP_RESTAURANTS: u64 = 3;

/// How many featured cuisines the home page shows.
const HOME_FEATURED_CUISINES: u64 = 4;

/// Default page size for the public listing.
const DEFAULT_PUBLIC_LIMIT: u64 = 50;

/// Restaurant service for business logic.
#[derive(Clone)]
pub struct RestaurantService {
    restaurant_repo: RestaurantRepository,
    owner_repo: RestaurantOwnerRepository,
    review_repo: ReviewRepository,
    dish_repo: DishRepository,
    follow_repo: FollowRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

/// Query for the public restaurant listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicListQuery {
    pub cuisine: Option<String>,
    pub search: Option<String>,
    /// When set, include pending/rejected and inactive restaurants.
    #[serde(default, rename = "includeAll")]
    pub include_all: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Input for creating a restaurant.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRestaurantInput {
    #[validate(length(min = 3, max = 100))]
    pub name: String,

    #[validate(length(min = 2, max = 50))]
    pub cuisine: String,

    #[validate(length(min = 2, max = 100))]
    pub location: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Price tier 1-5; defaults to 3.
    #[validate(range(min = 1, max = 5))]
    pub price_range: Option<i32>,

    #[validate(length(max = 20))]
    pub contact_phone: Option<String>,

    #[validate(email, length(max = 100))]
    pub contact_email: Option<String>,

    #[validate(length(max = 200))]
    pub website: Option<String>,

    pub address: Option<String>,
    pub opening_hours: Option<serde_json::Value>,
    pub social_links: Option<serde_json::Value>,
    pub image_url: Option<String>,
}

/// Input for updating a restaurant. All fields optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRestaurantInput {
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub cuisine: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub location: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 5))]
    pub price_range: Option<i32>,

    #[validate(length(max = 20))]
    pub contact_phone: Option<String>,

    #[validate(email, length(max = 100))]
    pub contact_email: Option<String>,

    #[validate(length(max = 200))]
    pub website: Option<String>,

    pub address: Option<String>,
    pub opening_hours: Option<serde_json::Value>,
    pub social_links: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateRestaurantInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cuisine.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.price_range.is_none()
            && self.contact_phone.is_none()
            && self.contact_email.is_none()
            && self.website.is_none()
            && self.address.is_none()
            && self.opening_hours.is_none()
            && self.social_links.is_none()
            && self.image_url.is_none()
            && self.is_active.is_none()
    }
}

/// Home page statistics.
#[derive(Debug, Serialize)]
pub struct HomeStats {
    pub total_restaurants: u64,
    pub total_reviews: u64,
    pub average_rating: f64,
    pub top_restaurants: Vec<FeedRestaurantRow>,
    pub featured_cuisines: Vec<String>,
}

/// Per-restaurant analytics for the owner dashboard.
#[derive(Debug, Serialize)]
pub struct RestaurantAnalytics {
    pub dish_count: u64,
    pub review_count: u64,
    pub avg_rating: f64,
    pub post_count: u64,
    pub follower_count: u64,
    pub recent_reviews: Vec<dishcovery_db::entities::review::Model>,
    pub popular_dishes: Vec<dishcovery_db::entities::dish::Model>,
}

impl RestaurantService {
    /// Create a new restaurant service.
    #[must_use]
    pub fn new(
        restaurant_repo: RestaurantRepository,
        owner_repo: RestaurantOwnerRepository,
        review_repo: ReviewRepository,
        dish_repo: DishRepository,
        follow_repo: FollowRepository,
        post_repo: PostRepository,
    ) -> Self {
        Self {
            restaurant_repo,
            owner_repo,
            review_repo,
            dish_repo,
            follow_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Public listing with aggregates.
    ///
    /// Only approved, active restaurants are visible unless `includeAll` is
    /// set.
    pub async fn list_public(
        &self,
        query: &PublicListQuery,
    ) -> AppResult<(Vec<PublicRestaurantRow>, u64)> {
        let filter = PublicRestaurantFilter {
            include_all: query.include_all,
            cuisine: query.cuisine.clone(),
            search: query.search.clone(),
            limit: query.limit.unwrap_or(DEFAULT_PUBLIC_LIMIT).min(100),
            offset: query.offset.unwrap_or(0),
        };

        let rows = self.restaurant_repo.find_public(&filter).await?;
        let total = self.restaurant_repo.count_public(&filter).await?;
        Ok((rows, total))
    }

    /// Get a restaurant by ID.
    pub async fn get(&self, id: &str) -> AppResult<restaurant::Model> {
        self.restaurant_repo.get_by_id(id).await
    }

    /// Create a restaurant for the given owner. Starts in `pending` status
    /// and registers the creator in the staff table.
    pub async fn create_for_owner(
        &self,
        owner: &user::Model,
        input: CreateRestaurantInput,
    ) -> AppResult<restaurant::Model> {
        input.validate()?;

        if self
            .restaurant_repo
            .find_by_name(input.name.trim())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A restaurant with this name already exists".to_string(),
            ));
        }

        let restaurant_id = self.id_gen.generate();

        let model = restaurant::ActiveModel {
            id: Set(restaurant_id.clone()),
            name: Set(input.name.trim().to_string()),
            cuisine: Set(Some(input.cuisine.trim().to_string())),
            location: Set(Some(input.location.trim().to_string())),
            address: Set(input.address),
            description: Set(input.description.map(|d| d.trim().to_string())),
            price_range: Set(input.price_range.unwrap_or(3)),
            owner_id: Set(Some(owner.id.clone())),
            status: Set(restaurant::Status::Pending),
            is_active: Set(true),
            contact_phone: Set(input.contact_phone.map(|p| p.trim().to_string())),
            contact_email: Set(input.contact_email.map(|e| e.trim().to_string())),
            website: Set(input.website.map(|w| w.trim().to_string())),
            opening_hours: Set(input.opening_hours),
            social_links: Set(input.social_links),
            image_url: Set(input.image_url),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let created = self.restaurant_repo.create(model).await?;

        let membership = restaurant_owner::ActiveModel {
            user_id: Set(owner.id.clone()),
            restaurant_id: Set(restaurant_id),
            role: Set(restaurant_owner::OwnerRole::Owner),
            created_at: Set(Utc::now()),
        };
        self.owner_repo.create(membership).await?;

        Ok(created)
    }

    /// Update a restaurant the user manages.
    pub async fn update_for_owner(
        &self,
        user_id: &str,
        restaurant_id: &str,
        input: UpdateRestaurantInput,
    ) -> AppResult<restaurant::Model> {
        input.validate()?;

        if !self.owner_repo.is_member(user_id, restaurant_id).await? {
            return Err(AppError::Forbidden(
                "You do not have permission to edit this restaurant".to_string(),
            ));
        }

        if input.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let existing = self.restaurant_repo.get_by_id(restaurant_id).await?;
        let mut active: restaurant::ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(cuisine) = input.cuisine {
            active.cuisine = Set(Some(cuisine.trim().to_string()));
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location.trim().to_string()));
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(price_range) = input.price_range {
            active.price_range = Set(price_range);
        }
        if let Some(contact_phone) = input.contact_phone {
            active.contact_phone = Set(Some(contact_phone));
        }
        if let Some(contact_email) = input.contact_email {
            active.contact_email = Set(Some(contact_email));
        }
        if let Some(website) = input.website {
            active.website = Set(Some(website));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(opening_hours) = input.opening_hours {
            active.opening_hours = Set(Some(opening_hours));
        }
        if let Some(social_links) = input.social_links {
            active.social_links = Set(Some(social_links));
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));

        self.restaurant_repo.update(active).await
    }

    /// Soft-delete a restaurant. Requires the `owner` staff role, not just
    /// membership.
    pub async fn deactivate_for_owner(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> AppResult<()> {
        if !self.owner_repo.is_owner(user_id, restaurant_id).await? {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this restaurant".to_string(),
            ));
        }

        let existing = self.restaurant_repo.get_by_id(restaurant_id).await?;
        let mut active: restaurant::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(Some(Utc::now()));

        self.restaurant_repo.update(active).await?;
        Ok(())
    }

    /// The caller's restaurants with menu and review aggregates.
    pub async fn owner_overview(&self, user_id: &str) -> AppResult<Vec<OwnerRestaurantRow>> {
        self.restaurant_repo.find_by_owner_with_stats(user_id).await
    }

    /// Home page statistics.
    pub async fn home_stats(&self) -> AppResult<HomeStats> {
        let total_restaurants = self.restaurant_repo.count_by_status(None).await?;
        let total_reviews = self.review_repo.count_all().await?;
        let average_rating = self.review_repo.average_rating().await?;
        let top_restaurants = self
            .restaurant_repo
            .find_top_rated(HOME_TOP_RESTAURANTS)
            .await?;
        let featured_cuisines = self
            .restaurant_repo
            .find_distinct_cuisines(HOME_FEATURED_CUISINES)
            .await?;

        Ok(HomeStats {
            total_restaurants,
            total_reviews,
            average_rating,
            top_restaurants,
            featured_cuisines,
        })
    }

    /// Analytics for one of the caller's restaurants.
    pub async fn analytics(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> AppResult<RestaurantAnalytics> {
        if !self.owner_repo.is_member(user_id, restaurant_id).await? {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        let dish_count = self.dish_repo.count_for_restaurant(restaurant_id).await?;
        let review_count = self.review_repo.count_for_restaurant(restaurant_id).await?;
        let avg_rating = self.review_repo.average_rating_for(restaurant_id).await?;
        let post_count = self.post_repo.count_for_restaurant(restaurant_id).await?;
        let follower_count = self
            .follow_repo
            .count_restaurant_followers(restaurant_id)
            .await?;
        let recent_reviews = self.review_repo.find_recent(restaurant_id, 5).await?;
        let popular_dishes = self
            .dish_repo
            .find_available_by_restaurant(restaurant_id, 5)
            .await?;

        Ok(RestaurantAnalytics {
            dish_count,
            review_count,
            avg_rating,
            post_count,
            follower_count,
            recent_reviews,
            popular_dishes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> RestaurantService {
        let db = Arc::new(db);
        RestaurantService::new(
            RestaurantRepository::new(Arc::clone(&db)),
            RestaurantOwnerRepository::new(Arc::clone(&db)),
            ReviewRepository::new(Arc::clone(&db)),
            DishRepository::new(Arc::clone(&db)),
            FollowRepository::new(Arc::clone(&db)),
            PostRepository::new(db),
        )
    }

    fn test_owner() -> user::Model {
        user::Model {
            id: "owner1".to_string(),
            email: "owner@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Chef Giovanni".to_string(),
            role: user::Role::Owner,
            avatar_url: None,
            bio: None,
            location: None,
            is_verified: false,
            last_login: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn valid_create_input() -> CreateRestaurantInput {
        CreateRestaurantInput {
            name: "Mama Mia Italian".to_string(),
            cuisine: "Italian".to_string(),
            location: "Little Italy".to_string(),
            description: None,
            price_range: None,
            contact_phone: None,
            contact_email: None,
            website: None,
            address: None,
            opening_hours: None,
            social_links: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_short_name() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let mut input = valid_create_input();
        input.name = "ab".to_string();

        let result = service.create_for_owner(&test_owner(), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_price_range() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let mut input = valid_create_input();
        input.price_range = Some(9);

        let result = service.create_for_owner(&test_owner(), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let existing = restaurant::Model {
            id: "r1".to_string(),
            name: "Mama Mia Italian".to_string(),
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
        };

        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[existing]])
            .into_connection();
        let service = service_with(db);

        let result = service
            .create_for_owner(&test_owner(), valid_create_input())
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_forbidden_for_non_member() {
        // Membership lookup returns no rows
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<
                dishcovery_db::entities::restaurant_owner::Model,
            >::new()])
            .into_connection();
        let service = service_with(db);

        let input = UpdateRestaurantInput {
            name: Some("New Name".to_string()),
            ..Default::default()
        };

        let result = service.update_for_owner("stranger", "r1", input).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_requires_fields() {
        let membership = restaurant_owner::Model {
            user_id: "owner1".to_string(),
            restaurant_id: "r1".to_string(),
            role: restaurant_owner::OwnerRole::Owner,
            created_at: Utc::now(),
        };
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[membership]])
            .into_connection();
        let service = service_with(db);

        let result = service
            .update_for_owner("owner1", "r1", UpdateRestaurantInput::default())
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
