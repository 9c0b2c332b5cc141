use std::sync::Arc;

use tracing::info;

use crate::application::dto::{
    CreateUserRequest, DeleteByIdRequest, MessageResponse, ToggleFavoriteRequest,
    UpdateUserRequest, UserDto,
};
use crate::application::errors::UseCaseError;
use crate::application::ports::{AnimalRepository, NoteRepository, PasswordHasher, UserRepository};
use crate::application::validation::{parse_id, present, require_all, validate_payload};
use crate::domain::authorization::{AuthorizationError, UserContext};
use crate::domain::entities::{FavoriteToggle, User};
use crate::domain::value_objects::{AnimalId, CollationKey, Role, UserId};

const CREATE_FIELDS_REQUIRED: &str = "All fields are required";
const UPDATE_FIELDS_REQUIRED: &str = "All fields except password are required";
const ID_REQUIRED: &str = "User ID Required";
const FAVORITE_FIELDS_REQUIRED: &str = "User ID and animal ID are required";
const DUPLICATE_USERNAME: &str = "Duplicate username";
const NOT_FOUND: &str = "User not found";

/// Use case: List users without their password hashes
pub struct ListUsersUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl ListUsersUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self) -> Result<Vec<UserDto>, UseCaseError> {
        let users = self.user_repo.list().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }
}

/// Use case: Register a new user
pub struct CreateUserUseCase {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CreateUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { user_repo, hasher }
    }

    pub async fn execute(
        &self,
        request: &CreateUserRequest,
    ) -> Result<MessageResponse, UseCaseError> {
        validate_payload(request)?;
        let [username, password] = require_all(
            [&request.username, &request.password],
            CREATE_FIELDS_REQUIRED,
        )?;
        let roles = Role::parse_all(request.roles.as_deref().unwrap_or_default())?;

        if self
            .user_repo
            .find_by_username_key(&CollationKey::new(username))
            .await?
            .is_some()
        {
            return Err(UseCaseError::conflict(DUPLICATE_USERNAME));
        }

        let password_hash = self.hasher.hash(password).await?;
        let user = User::new(username, password_hash, roles);
        self.user_repo.create(&user).await?;
        info!(user_id = %user.id(), "User {} created", user.username());

        Ok(MessageResponse::new(format!(
            "New user {} created",
            user.username()
        )))
    }
}

/// Use case: Edit username, roles, active flag and optionally the password
pub struct UpdateUserUseCase {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UpdateUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { user_repo, hasher }
    }

    pub async fn execute(
        &self,
        request: &UpdateUserRequest,
    ) -> Result<MessageResponse, UseCaseError> {
        validate_payload(request)?;
        let [id, username] = require_all([&request.id, &request.username], UPDATE_FIELDS_REQUIRED)?;
        let (roles, active) = match (&request.roles, request.active) {
            (Some(roles), Some(active)) if !roles.is_empty() => (Role::parse_all(roles)?, active),
            _ => return Err(UseCaseError::validation(UPDATE_FIELDS_REQUIRED)),
        };
        let id: UserId = parse_id(id, "id")?;

        let mut user = self
            .user_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(NOT_FOUND))?;

        if let Some(other) = self
            .user_repo
            .find_by_username_key(&CollationKey::new(username))
            .await?
        {
            if other.id() != user.id() {
                return Err(UseCaseError::conflict(DUPLICATE_USERNAME));
            }
        }

        user.update_profile(username, roles, active)?;
        if let Some(password) = present(&request.password) {
            user.set_password_hash(self.hasher.hash(password).await?);
        }
        self.user_repo.save(&user).await?;
        info!(user_id = %user.id(), "User {} updated", user.username());

        Ok(MessageResponse::new(format!("{} updated", user.username())))
    }
}

/// Use case: Delete a user that has no notes assigned
pub struct DeleteUserUseCase {
    user_repo: Arc<dyn UserRepository>,
    note_repo: Arc<dyn NoteRepository>,
}

impl DeleteUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, note_repo: Arc<dyn NoteRepository>) -> Self {
        Self {
            user_repo,
            note_repo,
        }
    }

    pub async fn execute(
        &self,
        request: &DeleteByIdRequest,
    ) -> Result<MessageResponse, UseCaseError> {
        let [id] = require_all([&request.id], ID_REQUIRED)?;
        let id: UserId = parse_id(id, "id")?;

        if self.note_repo.exists_for_user(&id).await? {
            return Err(UseCaseError::validation("User has assigned notes"));
        }

        let user = self
            .user_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(NOT_FOUND))?;

        self.user_repo.delete(user.id()).await?;
        info!(user_id = %id, "User {} deleted", user.username());

        Ok(MessageResponse::new(format!(
            "Username {} with ID {} deleted",
            user.username(),
            id
        )))
    }
}

/// Use case: Add or remove an animal from a user's favorites
pub struct ToggleFavoriteUseCase {
    user_repo: Arc<dyn UserRepository>,
    animal_repo: Arc<dyn AnimalRepository>,
}

impl ToggleFavoriteUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, animal_repo: Arc<dyn AnimalRepository>) -> Self {
        Self {
            user_repo,
            animal_repo,
        }
    }

    /// `caller` may only edit its own favorites unless it holds the blanket permission
    pub async fn execute(
        &self,
        caller: &UserContext,
        request: &ToggleFavoriteRequest,
    ) -> Result<MessageResponse, UseCaseError> {
        let [user_id, animal_id] = require_all(
            [&request.user_id, &request.animal_id],
            FAVORITE_FIELDS_REQUIRED,
        )?;
        let user_id: UserId = parse_id(user_id, "userId")?;
        let animal_id: AnimalId = parse_id(animal_id, "animalId")?;

        if !caller.can_edit_favorites_of(&user_id) {
            return Err(AuthorizationError::PermissionDenied("favorites".to_string()).into());
        }

        let mut user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(NOT_FOUND))?;
        let animal = self
            .animal_repo
            .find_by_id(&animal_id)
            .await?
            .ok_or_else(|| UseCaseError::not_found("Animal not found"))?;

        let toggle = user.toggle_favorite(animal_id);
        self.user_repo.save(&user).await?;

        let message = match toggle {
            FavoriteToggle::Added => format!(
                "{} updated by adding {} to its Favorites.",
                user.username(),
                animal.name()
            ),
            FavoriteToggle::Removed => format!(
                "{} updated by removing {} from its Favorites.",
                user.username(),
                animal.name()
            ),
        };
        Ok(MessageResponse::new(message))
    }
}
