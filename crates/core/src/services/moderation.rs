//! Moderation service.
//!
//! Admin-only operations: the dashboard rollup, user administration, the
//! restaurant approval queue and review removal.

use chrono::Utc;
use dishcovery_common::{AppError, AppResult};
use dishcovery_db::{
    entities::{restaurant, user},
    repositories::{
        ModerationRow, RestaurantRepository, ReviewModerationRow, ReviewRepository,
        UserRepository,
    },
};
use sea_orm::Set;
use serde::Serialize;

/// How many recent users and pending restaurants the dashboard shows.
const DASHBOARD_PREVIEW: u64 = 5;

/// Default page size for moderation listings.
const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Hard cap on moderation page sizes.
const MAX_PAGE_LIMIT: u64 = 100;

/// Moderation service for business logic.
#[derive(Clone)]
pub struct ModerationService {
    user_repo: UserRepository,
    restaurant_repo: RestaurantRepository,
    review_repo: ReviewRepository,
}

/// User totals broken down by role.
#[derive(Debug, Serialize)]
pub struct UserTotals {
    pub total: u64,
    pub customers: u64,
    pub owners: u64,
    pub admins: u64,
}

/// Restaurant totals broken down by status.
#[derive(Debug, Serialize)]
pub struct RestaurantTotals {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

/// Admin dashboard rollup.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub users: UserTotals,
    pub restaurants: RestaurantTotals,
    pub total_reviews: u64,
    pub average_rating: f64,
    pub recent_users: Vec<user::Model>,
    pub pending_restaurants: Vec<restaurant::Model>,
}

/// User detail for the admin view: an owner's restaurants come along.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: user::Model,
    pub restaurants: Vec<restaurant::Model>,
}

/// A page of rows plus the unpaginated total.
#[derive(Debug, Serialize)]
pub struct ModerationPage<T> {
    pub rows: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        restaurant_repo: RestaurantRepository,
        review_repo: ReviewRepository,
    ) -> Self {
        Self {
            user_repo,
            restaurant_repo,
            review_repo,
        }
    }

    /// The admin dashboard rollup.
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let users = UserTotals {
            total: self.user_repo.count_all().await?,
            customers: self.user_repo.count_by_role(user::Role::Customer).await?,
            owners: self.user_repo.count_by_role(user::Role::Owner).await?,
            admins: self.user_repo.count_by_role(user::Role::Admin).await?,
        };

        let restaurants = RestaurantTotals {
            total: self.restaurant_repo.count_by_status(None).await?,
            pending: self
                .restaurant_repo
                .count_by_status(Some(restaurant::Status::Pending))
                .await?,
            approved: self
                .restaurant_repo
                .count_by_status(Some(restaurant::Status::Approved))
                .await?,
            rejected: self
                .restaurant_repo
                .count_by_status(Some(restaurant::Status::Rejected))
                .await?,
        };

        Ok(DashboardStats {
            users,
            restaurants,
            total_reviews: self.review_repo.count_all().await?,
            average_rating: self.review_repo.average_rating().await?,
            recent_users: self.user_repo.find_recent(DASHBOARD_PREVIEW).await?,
            pending_restaurants: self.restaurant_repo.find_pending(DASHBOARD_PREVIEW).await?,
        })
    }

    /// All users, newest first.
    pub async fn list_users(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all().await
    }

    /// A user, with their restaurants when they hold the owner role.
    pub async fn get_user(&self, id: &str) -> AppResult<UserDetail> {
        let user = self.user_repo.get_by_id(id).await?;

        let restaurants = if user.role == user::Role::Owner {
            self.restaurant_repo.find_by_owner(&user.id).await?
        } else {
            Vec::new()
        };

        Ok(UserDetail { user, restaurants })
    }

    /// Change a user's role.
    pub async fn set_user_role(&self, id: &str, role: &str) -> AppResult<user::Model> {
        let role = user::Role::parse(role).ok_or_else(|| {
            AppError::Validation("Role must be customer, owner, or admin".to_string())
        })?;

        let existing = self.user_repo.get_by_id(id).await?;
        let mut active: user::ActiveModel = existing.into();
        active.role = Set(role);
        active.updated_at = Set(Some(Utc::now()));

        self.user_repo.update(active).await
    }

    /// Deactivate a user account. Admins cannot deactivate themselves.
    pub async fn deactivate_user(&self, acting_admin_id: &str, id: &str) -> AppResult<user::Model> {
        if acting_admin_id == id {
            return Err(AppError::Forbidden(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let existing = self.user_repo.get_by_id(id).await?;
        let mut active: user::ActiveModel = existing.into();
        active.is_verified = Set(false);
        active.updated_at = Set(Some(Utc::now()));

        self.user_repo.update(active).await
    }

    /// Delete a user account. Admins cannot delete themselves.
    pub async fn delete_user(&self, acting_admin_id: &str, id: &str) -> AppResult<()> {
        if acting_admin_id == id {
            return Err(AppError::Forbidden(
                "You cannot delete your own account".to_string(),
            ));
        }

        let removed = self.user_repo.delete_by_id(id).await?;
        if !removed {
            return Err(AppError::UserNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Restaurant moderation listing, optionally restricted to a status.
    pub async fn list_restaurants(
        &self,
        status: Option<&str>,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> AppResult<ModerationPage<ModerationRow>> {
        let status = match status {
            None | Some("") => None,
            Some(value) => Some(restaurant::Status::parse(value).ok_or_else(|| {
                AppError::Validation(
                    "Status must be pending, approved, or rejected".to_string(),
                )
            })?),
        };

        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
        let offset = (page - 1) * limit;

        let rows = self
            .restaurant_repo
            .find_moderation(status, limit, offset)
            .await?;
        let total = self.restaurant_repo.count_by_status(status).await?;

        Ok(ModerationPage {
            rows,
            total,
            page,
            limit,
        })
    }

    /// Approve, reject, or re-queue a restaurant.
    pub async fn set_restaurant_status(
        &self,
        id: &str,
        status: &str,
    ) -> AppResult<restaurant::Model> {
        let status = restaurant::Status::parse(status).ok_or_else(|| {
            AppError::Validation("Status must be pending, approved, or rejected".to_string())
        })?;

        let existing = self.restaurant_repo.get_by_id(id).await?;
        let mut active: restaurant::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now()));

        self.restaurant_repo.update(active).await
    }

    /// Hard-delete a restaurant. Cascades take dishes, reviews and posts.
    pub async fn delete_restaurant(&self, id: &str) -> AppResult<()> {
        let removed = self.restaurant_repo.delete_by_id(id).await?;
        if !removed {
            return Err(AppError::RestaurantNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Review moderation listing, newest first.
    pub async fn list_reviews(
        &self,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> AppResult<ModerationPage<ReviewModerationRow>> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
        let offset = (page - 1) * limit;

        let rows = self.review_repo.find_moderation(limit, offset).await?;
        let total = self.review_repo.count_all().await?;

        Ok(ModerationPage {
            rows,
            total,
            page,
            limit,
        })
    }

    /// Remove a review.
    pub async fn delete_review(&self, id: &str) -> AppResult<()> {
        let removed = self.review_repo.delete_by_id(id).await?;
        if !removed {
            return Err(AppError::NotFound("Review".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> ModerationService {
        let db = Arc::new(db);
        ModerationService::new(
            UserRepository::new(Arc::clone(&db)),
            RestaurantRepository::new(Arc::clone(&db)),
            ReviewRepository::new(db),
        )
    }

    fn test_user(id: &str, role: user::Role) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            password_hash: "hash".to_string(),
            name: "Some User".to_string(),
            role,
            avatar_url: None,
            bio: None,
            location: None,
            is_verified: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_set_user_role_rejects_unknown_role() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let result = service.set_user_role("u1", "superuser").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_user_role_missing_user_is_404() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service.set_user_role("missing", "owner").await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_deactivate_self_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let result = service.deactivate_user("a1", "a1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_self_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let result = service.delete_user("a1", "a1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_404() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let service = service_with(db);

        let result = service.delete_user("a1", "missing").await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_restaurants_rejects_unknown_status() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let result = service.list_restaurants(Some("closed"), None, None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_restaurant_status_rejects_unknown_status() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let service = service_with(db);

        let result = service.set_restaurant_status("r1", "closed").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_user_includes_owner_restaurants() {
        let owner = test_user("u1", user::Role::Owner);
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[owner]])
            .append_query_results([Vec::<restaurant::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let detail = service.get_user("u1").await.unwrap();
        assert!(detail.restaurants.is_empty());
    }
}
