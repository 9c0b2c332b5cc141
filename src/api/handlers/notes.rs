use axum::{extract::State, http::StatusCode, response::Json, Extension};

use crate::api::errors::ApiError;
use crate::api::router::AppState;
use crate::application::dto::{
    CreateNoteRequest, DeleteByIdRequest, MessageResponse, NoteDto, UpdateNoteRequest,
};
use crate::domain::authorization::{permissions, UserContext};
use crate::domain::validation::Validation;

/// GET /notes
#[utoipa::path(
    get,
    path = "/notes",
    tag = "notes",
    responses(
        (status = 200, description = "All notes with their owner's username", body = [NoteDto]),
        (status = 400, description = "No notes found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_notes_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<Vec<NoteDto>>, ApiError> {
    user.require(permissions::NOTES_READ)?;

    let notes = state.list_notes.execute().await?;
    Validation::validate_not_empty_collection(&notes, "notes", "No notes found")?;
    Ok(Json(notes))
}

/// POST /notes
#[utoipa::path(
    post,
    path = "/notes",
    tag = "notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = MessageResponse),
        (status = 409, description = "Duplicate note title")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_note_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    user.require(permissions::NOTES_WRITE)?;

    let response = state.create_note.execute(&request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PATCH /notes
#[utoipa::path(
    patch,
    path = "/notes",
    tag = "notes",
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = MessageResponse),
        (status = 404, description = "Note not found"),
        (status = 409, description = "Duplicate note title")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_note_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(request): Json<UpdateNoteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require(permissions::NOTES_WRITE)?;
    Ok(Json(state.update_note.execute(&request).await?))
}

/// DELETE /notes
#[utoipa::path(
    delete,
    path = "/notes",
    tag = "notes",
    request_body = DeleteByIdRequest,
    responses(
        (status = 200, description = "Note deleted", body = MessageResponse),
        (status = 404, description = "Note not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_note_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(request): Json<DeleteByIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require(permissions::NOTES_WRITE)?;
    Ok(Json(state.delete_note.execute(&request).await?))
}
