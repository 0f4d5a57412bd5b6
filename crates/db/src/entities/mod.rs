//! Database entities.

pub mod dish;
pub mod post;
pub mod post_like;
pub mod restaurant;
pub mod restaurant_follow;
pub mod restaurant_owner;
pub mod review;
pub mod user;
pub mod user_follow;

pub use dish::Entity as Dish;
pub use post::Entity as Post;
pub use post_like::Entity as PostLike;
pub use restaurant::Entity as Restaurant;
pub use restaurant_follow::Entity as RestaurantFollow;
pub use restaurant_owner::Entity as RestaurantOwner;
pub use review::Entity as Review;
pub use user::Entity as User;
pub use user_follow::Entity as UserFollow;
