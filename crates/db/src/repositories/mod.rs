//! Database repositories.
//!
//! Each repository wraps a shared connection and exposes the queries one
//! entity needs. Aggregate/reporting rows live next to the repository that
//! produces them.

mod dish;
mod follow;
mod post;
mod restaurant;
mod restaurant_owner;
mod review;
mod user;

pub use dish::{DishRepository, DishSearchFilter, DishSearchRow, SuggestionRow};
pub use follow::FollowRepository;
pub use post::{PostRepository, PostOwnerRow};
pub use restaurant::{
    FeedRestaurantRow, ModerationRow, OwnerRestaurantRow, PublicRestaurantFilter,
    PublicRestaurantRow, RestaurantRepository,
};
pub use restaurant_owner::RestaurantOwnerRepository;
pub use review::{ReviewModerationRow, ReviewRepository};
pub use user::UserRepository;
