//! API middleware.

use std::time::Instant;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use dishcovery_common::TokenCodec;
use dishcovery_core::{
    DishService, FeedService, FollowService, MediaService, ModerationService, PostService,
    RestaurantService, ReviewService, UserService,
};

/// Application state: one cloned service handle per domain.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub restaurant_service: RestaurantService,
    pub dish_service: DishService,
    pub review_service: ReviewService,
    pub follow_service: FollowService,
    pub feed_service: FeedService,
    pub post_service: PostService,
    pub moderation_service: ModerationService,
    pub media_service: MediaService,
    pub tokens: TokenCodec,
    pub started_at: Instant,
}

/// Authentication middleware.
///
/// Verifies the `Authorization: Bearer <token>` header and loads the current
/// user row into request extensions. Requests without a valid token pass
/// through unauthenticated; protected handlers reject via the `AuthUser`
/// extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(claims) = state.tokens.verify(token)
    {
        // The token is trusted for identity only; the row is loaded fresh so
        // role changes and deletions take effect immediately.
        match state.user_service.get(&claims.sub).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Bearer token for unknown user");
            }
        }
    }

    next.run(req).await
}
