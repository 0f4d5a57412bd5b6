//! Personalized feed composition.
//!
//! The feed blends three sources with strict priority and no global
//! re-ranking: restaurants the user follows, cuisine-based recommendations,
//! and recently-reviewed trending restaurants. Recommended and trending are
//! not deduplicated against each other; a restaurant in both sets appears
//! twice with different source tags.

use chrono::{Duration, Utc};
use dishcovery_common::AppResult;
use dishcovery_db::repositories::{FeedRestaurantRow, RestaurantRepository};
use serde::Serialize;

/// Cap on the followed section.
const FOLLOWED_LIMIT: u64 = 50;

/// Cap on the recommended section.
const RECOMMENDED_LIMIT: u64 = 30;

/// Cap on the trending section.
const TRENDING_LIMIT: u64 = 30;

/// Minimum rating for a review to seed cuisine recommendations.
const RECOMMENDED_MIN_RATING: i32 = 4;

/// Trending window in days.
const TRENDING_WINDOW_DAYS: i64 = 30;

/// Why a restaurant appears in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    Followed,
    Recommended,
    Trending,
}

/// A feed entry: a restaurant summary tagged with its source.
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    pub source: FeedSource,
    #[serde(flatten)]
    pub restaurant: FeedRestaurantRow,
}

/// Per-source entry counts.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeedStats {
    pub followed: usize,
    pub recommended: usize,
    pub trending: usize,
}

/// The composed feed.
#[derive(Debug, Serialize)]
pub struct PersonalizedFeed {
    pub entries: Vec<FeedEntry>,
    pub stats: FeedStats,
}

/// Feed service for business logic.
#[derive(Clone)]
pub struct FeedService {
    restaurant_repo: RestaurantRepository,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(restaurant_repo: RestaurantRepository) -> Self {
        Self { restaurant_repo }
    }

    /// Compose the personalized feed for a user.
    ///
    /// The user is not required to exist; an unknown ID simply yields empty
    /// sections. Any query failure fails the whole feed; there is no partial
    /// result.
    pub async fn personalized(&self, user_id: &str) -> AppResult<PersonalizedFeed> {
        let followed = self
            .restaurant_repo
            .find_followed_feed(user_id, FOLLOWED_LIMIT)
            .await?;

        let recommended = self
            .restaurant_repo
            .find_recommended_feed(user_id, RECOMMENDED_MIN_RATING, RECOMMENDED_LIMIT)
            .await?;

        let since = Utc::now() - Duration::days(TRENDING_WINDOW_DAYS);
        let trending = self
            .restaurant_repo
            .find_trending_feed(user_id, since, TRENDING_LIMIT)
            .await?;

        let stats = FeedStats {
            followed: followed.len(),
            recommended: recommended.len(),
            trending: trending.len(),
        };

        let entries = followed
            .into_iter()
            .map(|restaurant| FeedEntry {
                source: FeedSource::Followed,
                restaurant,
            })
            .chain(recommended.into_iter().map(|restaurant| FeedEntry {
                source: FeedSource::Recommended,
                restaurant,
            }))
            .chain(trending.into_iter().map(|restaurant| FeedEntry {
                source: FeedSource::Trending,
                restaurant,
            }))
            .collect();

        Ok(PersonalizedFeed { entries, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn feed_row(id: &str, name: &str, rating: f64, reviews: i64) -> BTreeMap<&'static str, Value> {
        btreemap! {
            "id" => Value::from(id.to_string()),
            "name" => Value::from(name.to_string()),
            "cuisine" => Value::from("Italian"),
            "location" => Value::from(None::<String>),
            "price_range" => Value::from(3i32),
            "image_url" => Value::from(None::<String>),
            "avg_rating" => Value::from(rating),
            "review_count" => Value::from(reviews),
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> FeedService {
        FeedService::new(RestaurantRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_feed_concatenates_in_source_order() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([
                vec![feed_row("r1", "Followed Place", 4.0, 10)],
                vec![feed_row("r2", "Recommended Place", 4.5, 8)],
                vec![feed_row("r3", "Trending Place", 4.2, 3)],
            ])
            .into_connection();

        let feed = service_with(db).personalized("u1").await.unwrap();

        assert_eq!(feed.entries.len(), 3);
        assert_eq!(feed.entries[0].source, FeedSource::Followed);
        assert_eq!(feed.entries[0].restaurant.id, "r1");
        assert_eq!(feed.entries[1].source, FeedSource::Recommended);
        assert_eq!(feed.entries[2].source, FeedSource::Trending);
        assert_eq!(feed.stats.followed, 1);
        assert_eq!(feed.stats.recommended, 1);
        assert_eq!(feed.stats.trending, 1);
    }

    #[tokio::test]
    async fn test_feed_for_brand_new_user_is_trending_only() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([
                Vec::<BTreeMap<&str, Value>>::new(),
                Vec::<BTreeMap<&str, Value>>::new(),
                vec![feed_row("r3", "Trending Place", 4.2, 3)],
            ])
            .into_connection();

        let feed = service_with(db).personalized("new-user").await.unwrap();

        assert_eq!(feed.stats.followed, 0);
        assert_eq!(feed.stats.recommended, 0);
        assert_eq!(feed.stats.trending, 1);
        assert!(
            feed.entries
                .iter()
                .all(|e| e.source == FeedSource::Trending)
        );
    }

    #[tokio::test]
    async fn test_feed_keeps_recommended_trending_duplicates() {
        // The same restaurant shows up in both the recommended and trending
        // result sets and is emitted twice.
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([
                Vec::<BTreeMap<&str, Value>>::new(),
                vec![feed_row("r9", "Busy Place", 4.8, 40)],
                vec![feed_row("r9", "Busy Place", 4.8, 40)],
            ])
            .into_connection();

        let feed = service_with(db).personalized("u1").await.unwrap();

        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].restaurant.id, "r9");
        assert_eq!(feed.entries[0].source, FeedSource::Recommended);
        assert_eq!(feed.entries[1].restaurant.id, "r9");
        assert_eq!(feed.entries[1].source, FeedSource::Trending);
    }

    #[tokio::test]
    async fn test_feed_fails_whole_when_any_query_fails() {
        // Only the followed query has a result; the recommended query hits
        // an exhausted mock and errors.
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![feed_row("r1", "Followed Place", 4.0, 10)]])
            .into_connection();

        let result = service_with(db).personalized("u1").await;
        assert!(result.is_err());
    }
}
