//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use dishcovery_common::AppError;
use dishcovery_db::entities::user;

/// Authenticated user extractor.
///
/// The auth middleware loads the user row for a valid bearer token and
/// stores it in request extensions; this extractor rejects with 401 when the
/// middleware found none.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Reject with 403 unless the user holds the owner role.
pub fn require_owner(user: &user::Model) -> Result<(), AppError> {
    if user.role == user::Role::Owner {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Owner access required".to_string(),
        ))
    }
}

/// Reject with 403 unless the user holds the admin role.
pub fn require_admin(user: &user::Model) -> Result<(), AppError> {
    if user.role == user::Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Admin access required".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: user::Role) -> user::Model {
        user::Model {
            id: "u1".to_string(),
            email: "a@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "A".to_string(),
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

    #[test]
    fn test_require_owner_rejects_customer() {
        assert!(require_owner(&user_with_role(user::Role::Customer)).is_err());
        assert!(require_owner(&user_with_role(user::Role::Owner)).is_ok());
    }

    #[test]
    fn test_require_admin_rejects_owner() {
        assert!(require_admin(&user_with_role(user::Role::Owner)).is_err());
        assert!(require_admin(&user_with_role(user::Role::Admin)).is_ok());
    }
}
