//! API integration tests.
//!
//! These drive the full router over a mock database: envelope shape, status
//! codes and the auth/role guards.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use dishcovery_api::{AppState, endpoints, router as api_router};
use dishcovery_common::{AppResult, StorageBackend, TokenCodec, UploadedFile};
use dishcovery_core::{
    DishService, FeedService, FollowService, MediaService, ModerationService, PostService,
    RestaurantService, ReviewService, UserService, hash_password,
};
use dishcovery_db::{
    entities::{restaurant, restaurant_follow, user},
    repositories::{
        DishRepository, FollowRepository, PostRepository, RestaurantOwnerRepository,
        RestaurantRepository, ReviewRepository, UserRepository,
    },
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use std::collections::BTreeMap;
use tower::ServiceExt;

const TEST_SECRET: &str = "test_secret";

/// Storage stub; upload tests live in the core crate.
struct NullStorage;

#[async_trait::async_trait]
impl StorageBackend for NullStorage {
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<UploadedFile> {
        Ok(UploadedFile {
            key: key.to_string(),
            url: format!("/uploads/{key}"),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5: String::new(),
        })
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("/uploads/{key}")
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Ok(true)
    }
}

/// Build app state over the given mock connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let restaurant_repo = RestaurantRepository::new(Arc::clone(&db));
    let owner_repo = RestaurantOwnerRepository::new(Arc::clone(&db));
    let dish_repo = DishRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));

    AppState {
        user_service: UserService::new(user_repo.clone()),
        restaurant_service: RestaurantService::new(
            restaurant_repo.clone(),
            owner_repo.clone(),
            review_repo.clone(),
            dish_repo.clone(),
            follow_repo.clone(),
            post_repo.clone(),
        ),
        dish_service: DishService::new(
            dish_repo,
            restaurant_repo.clone(),
            owner_repo.clone(),
        ),
        review_service: ReviewService::new(review_repo.clone(), restaurant_repo.clone()),
        follow_service: FollowService::new(
            follow_repo,
            restaurant_repo.clone(),
            user_repo.clone(),
        ),
        feed_service: FeedService::new(restaurant_repo.clone()),
        post_service: PostService::new(post_repo, owner_repo),
        moderation_service: ModerationService::new(user_repo, restaurant_repo, review_repo),
        media_service: MediaService::new(Arc::new(NullStorage), 5 * 1024 * 1024),
        tokens: TokenCodec::new(TEST_SECRET, 1),
        started_at: Instant::now(),
    }
}

/// Build the app the way the server does: `/api` nest, auth layer, fallback.
fn create_test_app(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);

    Router::new()
        .nest("/api", api_router())
        .fallback(endpoints::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            dishcovery_api::middleware::auth_middleware,
        ))
        .with_state(state)
}

fn empty_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::MySql).into_connection()
}

fn test_user(id: &str, role: user::Role) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        password_hash: hash_password("password123").unwrap(),
        name: "Foodie Alex".to_string(),
        role,
        avatar_url: None,
        bio: None,
        location: None,
        is_verified: true,
        last_login: None,
        created_at: chrono::Utc::now(),
        updated_at: None,
    }
}

fn test_restaurant(id: &str) -> restaurant::Model {
    restaurant::Model {
        id: id.to_string(),
        name: "Mama Mia".to_string(),
        cuisine: Some("Italian".to_string()),
        location: Some("Little Italy".to_string()),
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
        created_at: chrono::Utc::now(),
        updated_at: None,
    }
}

fn bearer_for(user: &user::Model) -> String {
    let codec = TokenCodec::new(TEST_SECRET, 1);
    let token = codec
        .issue(&user.id, &user.email, &user.name, user.role.as_str())
        .unwrap();
    format!("Bearer {token}")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_ok() {
    let app = create_test_app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = create_test_app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_register_with_short_password_is_400() {
    let app = create_test_app(empty_mock_db());

    let body = serde_json::json!({
        "email": "alex@example.com",
        "password": "short",
        "name": "Foodie Alex",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_unknown_email_is_401() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = create_test_app(db);

    let body = serde_json::json!({
        "email": "nobody@example.com",
        "password": "password123",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_restaurant_detail_missing_is_404() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<restaurant::Model>::new()])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/restaurants/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "RESTAURANT_NOT_FOUND");
}

#[tokio::test]
async fn test_feed_requires_user_id() {
    let app = create_test_app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/restaurants/feed/personalized")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feed_for_new_user_is_trending_only() {
    let trending_row: BTreeMap<&str, Value> = [
        ("id", Value::from("r3")),
        ("name", Value::from("Trending Place")),
        ("cuisine", Value::from("Thai")),
        ("location", Value::from(None::<String>)),
        ("price_range", Value::from(3i32)),
        ("image_url", Value::from(None::<String>)),
        ("avg_rating", Value::from(4.2f64)),
        ("review_count", Value::from(3i64)),
    ]
    .into_iter()
    .collect();

    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([
            Vec::<BTreeMap<&str, Value>>::new(),
            Vec::<BTreeMap<&str, Value>>::new(),
            vec![trending_row],
        ])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/restaurants/feed/personalized?userId=brand-new")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["stats"]["followed"], 0);
    assert_eq!(json["data"]["stats"]["recommended"], 0);
    assert_eq!(json["data"]["stats"]["trending"], 1);
    assert_eq!(json["data"]["entries"][0]["source"], "trending");
}

#[tokio::test]
async fn test_owner_routes_require_token() {
    let app = create_test_app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/owner/restaurants")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_owner_routes_reject_customers() {
    let customer = test_user("u1", user::Role::Customer);
    let auth = bearer_for(&customer);

    // The auth middleware loads the user row; the role guard then rejects.
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[customer]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/owner/restaurants")
                .header(header::AUTHORIZATION, auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_routes_reject_owners() {
    let owner = test_user("u2", user::Role::Owner);
    let auth = bearer_for(&owner);

    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[owner]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/dashboard")
                .header(header::AUTHORIZATION, auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_second_follow_is_conflict() {
    let customer = test_user("u1", user::Role::Customer);
    let auth = bearer_for(&customer);

    let existing_follow = restaurant_follow::Model {
        user_id: "u1".to_string(),
        restaurant_id: "r1".to_string(),
        notifications: true,
        created_at: chrono::Utc::now(),
    };

    // Query order: auth user load, restaurant lookup, existing follow.
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[customer]])
        .append_query_results([[test_restaurant("r1")]])
        .append_query_results([[existing_follow]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/restaurants/r1/follow")
                .header(header::AUTHORIZATION, auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn test_review_missing_restaurant_is_404() {
    let customer = test_user("u1", user::Role::Customer);
    let auth = bearer_for(&customer);

    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[customer]])
        .append_query_results([Vec::<restaurant::Model>::new()])
        .into_connection();
    let app = create_test_app(db);

    let body = serde_json::json!({ "rating": 5, "comment": "Great" });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/restaurants/missing/reviews")
                .header(header::AUTHORIZATION, auth)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_requires_token() {
    let app = create_test_app(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
