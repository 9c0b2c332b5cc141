use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use crate::api::errors::ApiError;
use crate::api::middleware::read_multipart;
use crate::api::router::AppState;
use crate::application::dto::{
    DeleteByIdRequest, ImageDto, MessageResponse, UpdateImageRequest,
};
use crate::domain::authorization::{permissions, UserContext};
use crate::domain::validation::Validation;

/// GET /images
#[utoipa::path(
    get,
    path = "/images",
    tag = "images",
    responses(
        (status = 200, description = "All images", body = [ImageDto]),
        (status = 400, description = "No images found")
    )
)]
pub async fn list_images_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ImageDto>>, ApiError> {
    let images = state.list_images.execute().await?;
    Validation::validate_not_empty_collection(&images, "images", "No images found")?;
    Ok(Json(images))
}

/// POST /images
/// Multipart form: `animalID`, `caption`, `image` file
#[utoipa::path(
    post,
    path = "/images",
    tag = "images",
    request_body(content = String, content_type = "multipart/form-data", description = "animalID, caption, image"),
    responses(
        (status = 201, description = "Image created", body = MessageResponse),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Animal not found"),
        (status = 415, description = "Unsupported image type")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_image_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    user.require(permissions::IMAGES_WRITE)?;

    let mut form = read_multipart(&state.staging, multipart).await?;
    let file = form.take_file();
    let response = state
        .create_image
        .execute(form.text("animalID"), form.text("caption"), file)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// PATCH /images
#[utoipa::path(
    patch,
    path = "/images",
    tag = "images",
    request_body = UpdateImageRequest,
    responses(
        (status = 200, description = "Caption updated", body = MessageResponse),
        (status = 404, description = "Image not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_image_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(request): Json<UpdateImageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require(permissions::IMAGES_WRITE)?;
    Ok(Json(state.update_image.execute(&request).await?))
}

/// DELETE /images
#[utoipa::path(
    delete,
    path = "/images",
    tag = "images",
    request_body = DeleteByIdRequest,
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 404, description = "Image not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_image_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(request): Json<DeleteByIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require(permissions::IMAGES_WRITE)?;
    Ok(Json(state.delete_image.execute(&request).await?))
}
