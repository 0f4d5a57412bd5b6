//! Business logic services.

pub mod dish;
pub mod feed;
pub mod follow;
pub mod media;
pub mod moderation;
pub mod post;
pub mod restaurant;
pub mod review;
pub mod user;

pub use dish::{CreateDishInput, DishSearchPage, DishSearchQuery, DishService, UpdateDishInput};
pub use feed::{FeedEntry, FeedService, FeedSource, FeedStats, PersonalizedFeed};
pub use follow::FollowService;
pub use media::{MediaService, StoredImage};
pub use moderation::{DashboardStats, ModerationPage, ModerationService, UserDetail};
pub use post::{CreatePostInput, PostService};
pub use restaurant::{
    CreateRestaurantInput, HomeStats, PublicListQuery, RestaurantAnalytics, RestaurantService,
    UpdateRestaurantInput,
};
pub use review::{CreateReviewInput, ReviewService};
pub use user::{
    ChangePasswordInput, CreateUserInput, UpdateProfileInput, UserService, hash_password,
    verify_password,
};
