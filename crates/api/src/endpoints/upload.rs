//! Image upload endpoint.

use axum::{
    Router,
    extract::{Multipart, State},
    routing::post,
};
use dishcovery_common::{AppError, AppResult};
use dishcovery_core::StoredImage;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Accept a multipart upload with an `image` field and store it.
async fn upload_image(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<StoredImage>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name = String::from("upload");
    let mut content_type = String::from("application/octet-stream");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        if let Some(name) = field.file_name() {
            file_name = name.to_string();
        }
        if let Some(ct) = field.content_type() {
            content_type = ct.to_string();
        }
        file_data = Some(
            field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?
                .to_vec(),
        );
    }

    let Some(data) = file_data else {
        return Err(AppError::BadRequest(
            "Multipart field 'image' is required".to_string(),
        ));
    };

    let stored = state
        .media_service
        .store_image(&user.id, &file_name, &content_type, &data)
        .await?;

    Ok(ApiResponse::created(stored).with_message("Image uploaded"))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload_image))
}
