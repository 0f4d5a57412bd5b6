//! Dishcovery server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, middleware, routing::get};
use dishcovery_api::{AppState, endpoints, router as api_router};
use dishcovery_common::{Config, LocalStorage, TokenCodec};
use dishcovery_core::{
    DishService, FeedService, FollowService, MediaService, ModerationService, PostService,
    RestaurantService, ReviewService, UserService,
};
use dishcovery_db::repositories::{
    DishRepository, FollowRepository, PostRepository, RestaurantOwnerRepository,
    RestaurantRepository, ReviewRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Welcome envelope for the root path.
async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "Dishcovery API",
        "endpoints": {
            "auth": "/api/auth",
            "restaurants": "/api/restaurants",
            "users": "/api/users",
            "owner": "/api/owner",
            "admin": "/api/admin",
            "upload": "/api/upload",
            "health": "/api/health",
        },
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env first so it can feed both config layers
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dishcovery=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting dishcovery server...");

    let config = Config::load()?;

    let db = dishcovery_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    dishcovery_db::migrate(&db).await?;
    info!("Migrations completed");

    // Repositories share one pooled connection
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let restaurant_repo = RestaurantRepository::new(Arc::clone(&db));
    let owner_repo = RestaurantOwnerRepository::new(Arc::clone(&db));
    let dish_repo = DishRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));

    // Services
    let user_service = UserService::new(user_repo.clone());
    let restaurant_service = RestaurantService::new(
        restaurant_repo.clone(),
        owner_repo.clone(),
        review_repo.clone(),
        dish_repo.clone(),
        follow_repo.clone(),
        post_repo.clone(),
    );
    let dish_service = DishService::new(
        dish_repo.clone(),
        restaurant_repo.clone(),
        owner_repo.clone(),
    );
    let review_service = ReviewService::new(review_repo.clone(), restaurant_repo.clone());
    let follow_service = FollowService::new(
        follow_repo.clone(),
        restaurant_repo.clone(),
        user_repo.clone(),
    );
    let feed_service = FeedService::new(restaurant_repo.clone());
    let post_service = PostService::new(post_repo, owner_repo);
    let moderation_service = ModerationService::new(user_repo, restaurant_repo, review_repo);

    let upload_dir = PathBuf::from(&config.storage.upload_dir);
    let storage = Arc::new(LocalStorage::new(
        upload_dir.clone(),
        config.storage.base_url.clone(),
    ));
    let media_service = MediaService::new(storage, config.storage.max_upload_bytes);

    let tokens = TokenCodec::new(&config.auth.jwt_secret, config.auth.token_ttl_hours);

    let state = AppState {
        user_service,
        restaurant_service,
        dish_service,
        review_service,
        follow_service,
        feed_service,
        post_service,
        moderation_service,
        media_service,
        tokens,
        started_at: Instant::now(),
    };

    let app = Router::new()
        .route("/", get(welcome))
        .nest("/api", api_router())
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .fallback(endpoints::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            dishcovery_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = SocketAddr::from((config.server.host.parse::<std::net::IpAddr>()?, config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
