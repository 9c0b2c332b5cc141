use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::entities::{Animal, Image, Note, User};
use crate::domain::value_objects::Role;

/// DTO for animal responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimalDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Animal> for AnimalDto {
    fn from(animal: Animal) -> Self {
        Self {
            id: animal.id().to_string(),
            name: animal.name().to_string(),
            description: animal.description().to_string(),
            created_at: animal.created_at().to_rfc3339(),
            updated_at: animal.updated_at().to_rfc3339(),
        }
    }
}

/// DTO for image responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    pub id: String,
    pub animal: String,
    pub path: String,
    pub caption: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Image> for ImageDto {
    fn from(image: Image) -> Self {
        Self {
            id: image.id().to_string(),
            animal: image.animal().to_string(),
            path: image.path().to_string(),
            caption: image.caption().to_string(),
            created_at: image.created_at().to_rfc3339(),
            updated_at: image.updated_at().to_rfc3339(),
        }
    }
}

/// DTO for user responses. The password hash is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub roles: Vec<Role>,
    pub active: bool,
    pub favorites: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            roles: user.roles().to_vec(),
            active: user.is_active(),
            favorites: user.favorites().iter().map(|id| id.to_string()).collect(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

/// DTO for note responses, with the owner's username attached
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    pub id: String,
    pub user: String,
    pub username: Option<String>,
    pub animal: String,
    pub title: String,
    pub text: String,
    pub ticket: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl NoteDto {
    pub fn new(note: Note, username: Option<String>) -> Self {
        Self {
            id: note.id().to_string(),
            user: note.user().to_string(),
            username,
            animal: note.animal().to_string(),
            title: note.title().to_string(),
            text: note.text().to_string(),
            ticket: note.ticket(),
            created_at: note.created_at().to_rfc3339(),
            updated_at: note.updated_at().to_rfc3339(),
        }
    }
}

/// Plain `{ "message": ... }` body used by every mutating route
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login and refresh response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// Request body for deleting an animal by name
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DeleteAnimalRequest {
    pub name: Option<String>,
}

/// Request body addressing a record by id
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DeleteByIdRequest {
    pub id: Option<String>,
}

/// Request body for changing an image caption
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateImageRequest {
    pub id: Option<String>,
    #[validate(length(max = 500, message = "Caption must be at most 500 characters"))]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(max = 64, message = "Username must be at most 64 characters"))]
    pub username: Option<String>,
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    pub id: Option<String>,
    #[validate(length(max = 64, message = "Username must be at most 64 characters"))]
    pub username: Option<String>,
    pub roles: Option<Vec<String>>,
    pub active: Option<bool>,
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteRequest {
    pub user_id: Option<String>,
    pub animal_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateNoteRequest {
    pub user: Option<String>,
    pub animal: Option<String>,
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "Text must be at most 10000 characters"))]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateNoteRequest {
    pub id: Option<String>,
    pub user: Option<String>,
    pub animal: Option<String>,
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "Text must be at most 10000 characters"))]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}
