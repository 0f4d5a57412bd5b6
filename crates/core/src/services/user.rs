//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use dishcovery_common::{AppError, AppResult, IdGenerator};
use dishcovery_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email, length(max = 100))]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(length(min = 2, max = 100))]
    pub name: String,

    /// Requested role; defaults to `customer`.
    pub role: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

/// Input for updating a user profile.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(length(max = 500))]
    pub avatar_url: Option<String>,
}

impl UpdateProfileInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
    }
}

/// Input for changing a password.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub current_password: String,

    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user account.
    pub async fn register(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let role = match input.role.as_deref() {
            None => user::Role::Customer,
            Some(value) => user::Role::parse(value).ok_or_else(|| {
                AppError::Validation("Role must be customer, owner, or admin".to_string())
            })?,
        };

        // Duplicate email is a conflict, not a validation failure
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(input.email),
            password_hash: Set(password_hash),
            name: Set(input.name),
            role: Set(role),
            location: Set(input.location),
            bio: Set(input.bio),
            is_verified: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        self.user_repo.create(model).await
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<user::Model> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        self.user_repo.touch_last_login(user).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Update profile fields of the given user.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        if input.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location));
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        active.updated_at = Set(Some(Utc::now()));

        self.user_repo.update(active).await
    }

    /// Change the user's password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: &str,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        if !verify_password(&input.current_password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(hash_password(&input.new_password)?);
        active.updated_at = Set(Some(Utc::now()));

        self.user_repo.update(active).await?;
        Ok(())
    }
}

/// Hash a password with Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
