use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use crate::api::errors::ApiError;
use crate::api::middleware::read_multipart;
use crate::api::router::AppState;
use crate::application::dto::{AnimalDto, DeleteAnimalRequest, MessageResponse};
use crate::application::use_cases::AnimalSubmission;
use crate::domain::authorization::{permissions, UserContext};
use crate::domain::validation::Validation;

/// GET /animals
#[utoipa::path(
    get,
    path = "/animals",
    tag = "animals",
    responses(
        (status = 200, description = "All animals", body = [AnimalDto]),
        (status = 400, description = "No animals found")
    )
)]
pub async fn list_animals_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnimalDto>>, ApiError> {
    let animals = state.animals.list().await?;
    Validation::validate_not_empty_collection(&animals, "animals", "No animals found")?;
    Ok(Json(animals))
}

/// POST /animals
/// Multipart form: `name`, `description`, optional `image` file and `caption`
#[utoipa::path(
    post,
    path = "/animals",
    tag = "animals",
    request_body(content = String, content_type = "multipart/form-data", description = "name, description, image?, caption?"),
    responses(
        (status = 201, description = "Animal created", body = MessageResponse),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Duplicate animal name"),
        (status = 415, description = "Unsupported image type")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_animal_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    user.require(permissions::ANIMALS_WRITE)?;

    let mut form = read_multipart(&state.staging, multipart).await?;
    let outcome = state.animals.create(submission(&mut form)).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new(outcome.message()))))
}

/// PATCH /animals
/// Multipart form: `targetName?`, `name`, `description`, optional `image` file and `caption`
#[utoipa::path(
    patch,
    path = "/animals",
    tag = "animals",
    request_body(content = String, content_type = "multipart/form-data", description = "targetName?, name, description, image?, caption?"),
    responses(
        (status = 200, description = "Animal updated", body = MessageResponse),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Animal not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_animal_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require(permissions::ANIMALS_WRITE)?;

    let mut form = read_multipart(&state.staging, multipart).await?;
    let target = form.text("targetName");
    let outcome = state
        .animals
        .update(target.as_deref(), submission(&mut form))
        .await?;

    Ok(Json(MessageResponse::new(outcome.message())))
}

/// DELETE /animals
#[utoipa::path(
    delete,
    path = "/animals",
    tag = "animals",
    request_body = DeleteAnimalRequest,
    responses(
        (status = 200, description = "Animal and its images deleted", body = MessageResponse),
        (status = 400, description = "Animal name required"),
        (status = 404, description = "Animal not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_animal_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(request): Json<DeleteAnimalRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require(permissions::ANIMALS_DELETE)?;

    let name = request.name.unwrap_or_default();
    let outcome = state.animals.delete(&name).await?;

    Ok(Json(MessageResponse::new(outcome.message())))
}

fn submission(form: &mut crate::api::middleware::MultipartForm) -> AnimalSubmission {
    let mut submission = AnimalSubmission::new(
        form.text("name").unwrap_or_default(),
        form.text("description").unwrap_or_default(),
    );
    if let Some(file) = form.take_file() {
        submission = submission.with_image(file, form.text("caption"));
    }
    submission
}
