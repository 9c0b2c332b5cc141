use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::application::dto::{
    CreateNoteRequest, DeleteByIdRequest, MessageResponse, NoteDto, UpdateNoteRequest,
};
use crate::application::errors::UseCaseError;
use crate::application::ports::{AnimalRepository, NoteRepository, UserRepository};
use crate::application::validation::{parse_id, require_all, validate_payload};
use crate::domain::entities::Note;
use crate::domain::value_objects::{AnimalId, CollationKey, NoteId, UserId};

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const ID_REQUIRED: &str = "Note ID required";
const DUPLICATE_TITLE: &str = "Duplicate note title";
const NOT_FOUND: &str = "Note not found";

/// Use case: List notes with their owner's username
pub struct ListNotesUseCase {
    note_repo: Arc<dyn NoteRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl ListNotesUseCase {
    pub fn new(note_repo: Arc<dyn NoteRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            note_repo,
            user_repo,
        }
    }

    pub async fn execute(&self) -> Result<Vec<NoteDto>, UseCaseError> {
        let notes = self.note_repo.list().await?;
        if notes.is_empty() {
            return Ok(Vec::new());
        }

        let usernames: HashMap<UserId, String> = self
            .user_repo
            .list()
            .await?
            .into_iter()
            .map(|user| (*user.id(), user.username().to_string()))
            .collect();

        Ok(notes
            .into_iter()
            .map(|note| {
                let username = usernames.get(note.user()).cloned();
                NoteDto::new(note, username)
            })
            .collect())
    }
}

/// Checks shared by create and update: referenced user and animal exist
async fn ensure_references(
    user_repo: &dyn UserRepository,
    animal_repo: &dyn AnimalRepository,
    user: &UserId,
    animal: &AnimalId,
) -> Result<(), UseCaseError> {
    if user_repo.find_by_id(user).await?.is_none() {
        return Err(UseCaseError::not_found("User not found"));
    }
    if animal_repo.find_by_id(animal).await?.is_none() {
        return Err(UseCaseError::not_found("Animal not found"));
    }
    Ok(())
}

/// Use case: Create a note and assign it the next ticket number
pub struct CreateNoteUseCase {
    note_repo: Arc<dyn NoteRepository>,
    user_repo: Arc<dyn UserRepository>,
    animal_repo: Arc<dyn AnimalRepository>,
}

impl CreateNoteUseCase {
    pub fn new(
        note_repo: Arc<dyn NoteRepository>,
        user_repo: Arc<dyn UserRepository>,
        animal_repo: Arc<dyn AnimalRepository>,
    ) -> Self {
        Self {
            note_repo,
            user_repo,
            animal_repo,
        }
    }

    pub async fn execute(
        &self,
        request: &CreateNoteRequest,
    ) -> Result<MessageResponse, UseCaseError> {
        validate_payload(request)?;
        let [user, animal, title, text] = require_all(
            [&request.user, &request.animal, &request.title, &request.text],
            ALL_FIELDS_REQUIRED,
        )?;
        let user: UserId = parse_id(user, "user")?;
        let animal: AnimalId = parse_id(animal, "animal")?;

        ensure_references(
            self.user_repo.as_ref(),
            self.animal_repo.as_ref(),
            &user,
            &animal,
        )
        .await?;

        if self
            .note_repo
            .find_by_title_key(&CollationKey::new(title))
            .await?
            .is_some()
        {
            return Err(UseCaseError::conflict(DUPLICATE_TITLE));
        }

        let ticket = self.note_repo.next_ticket().await?;
        let note = Note::new(user, animal, title, text, ticket);
        self.note_repo.create(&note).await?;
        info!(note_id = %note.id(), ticket, "Note created");

        Ok(MessageResponse::new("New note created"))
    }
}

/// Use case: Edit a note. The ticket is kept.
pub struct UpdateNoteUseCase {
    note_repo: Arc<dyn NoteRepository>,
    user_repo: Arc<dyn UserRepository>,
    animal_repo: Arc<dyn AnimalRepository>,
}

impl UpdateNoteUseCase {
    pub fn new(
        note_repo: Arc<dyn NoteRepository>,
        user_repo: Arc<dyn UserRepository>,
        animal_repo: Arc<dyn AnimalRepository>,
    ) -> Self {
        Self {
            note_repo,
            user_repo,
            animal_repo,
        }
    }

    pub async fn execute(
        &self,
        request: &UpdateNoteRequest,
    ) -> Result<MessageResponse, UseCaseError> {
        validate_payload(request)?;
        let [id, user, animal, title, text] = require_all(
            [
                &request.id,
                &request.user,
                &request.animal,
                &request.title,
                &request.text,
            ],
            ALL_FIELDS_REQUIRED,
        )?;
        let id: NoteId = parse_id(id, "id")?;
        let user: UserId = parse_id(user, "user")?;
        let animal: AnimalId = parse_id(animal, "animal")?;

        let mut note = self
            .note_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(NOT_FOUND))?;

        ensure_references(
            self.user_repo.as_ref(),
            self.animal_repo.as_ref(),
            &user,
            &animal,
        )
        .await?;

        if let Some(other) = self
            .note_repo
            .find_by_title_key(&CollationKey::new(title))
            .await?
        {
            if other.id() != note.id() {
                return Err(UseCaseError::conflict(DUPLICATE_TITLE));
            }
        }

        note.update(user, animal, title, text);
        self.note_repo.save(&note).await?;

        Ok(MessageResponse::new(format!("'{}' updated", note.title())))
    }
}

/// Use case: Delete a note
pub struct DeleteNoteUseCase {
    note_repo: Arc<dyn NoteRepository>,
}

impl DeleteNoteUseCase {
    pub fn new(note_repo: Arc<dyn NoteRepository>) -> Self {
        Self { note_repo }
    }

    pub async fn execute(
        &self,
        request: &DeleteByIdRequest,
    ) -> Result<MessageResponse, UseCaseError> {
        let [id] = require_all([&request.id], ID_REQUIRED)?;
        let id: NoteId = parse_id(id, "id")?;

        let note = self
            .note_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(NOT_FOUND))?;

        self.note_repo.delete(&id).await?;
        info!(note_id = %id, ticket = note.ticket(), "Note deleted");

        Ok(MessageResponse::new(format!(
            "Note '{}' with ID {} deleted",
            note.title(),
            id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockAnimalRepository, MockNoteRepository, MockUserRepository};
    use crate::domain::entities::{Animal, User};

    fn known_user_and_animal() -> (MockUserRepository, MockAnimalRepository) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(User::new("dave", "h".into(), vec![]))));
        let mut animals = MockAnimalRepository::new();
        animals
            .expect_find_by_id()
            .returning(|_| Ok(Some(Animal::new("Rex", "A dog"))));
        (users, animals)
    }

    fn create_request(title: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            user: Some(UserId::new().to_string()),
            animal: Some(AnimalId::new().to_string()),
            title: Some(title.to_string()),
            text: Some("text".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_note_takes_ticket_from_store() {
        // Arrange
        let (users, animals) = known_user_and_animal();
        let mut notes = MockNoteRepository::new();
        notes.expect_find_by_title_key().returning(|_| Ok(None));
        notes.expect_next_ticket().times(1).returning(|| Ok(500));
        notes
            .expect_create()
            .withf(|n| n.ticket() == 500 && n.title() == "Vet visit")
            .times(1)
            .returning(|_| Ok(()));
        let use_case = CreateNoteUseCase::new(Arc::new(notes), Arc::new(users), Arc::new(animals));

        // Act
        let response = use_case.execute(&create_request("Vet visit")).await.unwrap();

        // Assert
        assert_eq!(response.message, "New note created");
    }

    #[tokio::test]
    async fn test_create_note_duplicate_title() {
        let (users, animals) = known_user_and_animal();
        let mut notes = MockNoteRepository::new();
        notes
            .expect_find_by_title_key()
            .withf(|key| key.as_str() == "vet visit")
            .returning(|_| {
                Ok(Some(Note::new(UserId::new(), AnimalId::new(), "vet visit", "t", 500)))
            });
        notes.expect_next_ticket().times(0);
        let use_case = CreateNoteUseCase::new(Arc::new(notes), Arc::new(users), Arc::new(animals));

        let result = use_case.execute(&create_request("Vet Visit")).await;

        assert!(matches!(result, Err(UseCaseError::Conflict(m)) if m == "Duplicate note title"));
    }

    #[tokio::test]
    async fn test_create_note_missing_fields() {
        let use_case = CreateNoteUseCase::new(
            Arc::new(MockNoteRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockAnimalRepository::new()),
        );

        let result = use_case
            .execute(&CreateNoteRequest {
                title: Some("t".into()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(UseCaseError::Validation(m)) if m == "All fields are required"));
    }

    #[tokio::test]
    async fn test_update_note_keeps_ticket() {
        let existing = Note::new(UserId::new(), AnimalId::new(), "Vet visit", "t", 512);
        let id = *existing.id();
        let same = existing.clone();
        let (users, animals) = known_user_and_animal();
        let mut notes = MockNoteRepository::new();
        notes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        notes
            .expect_find_by_title_key()
            .returning(move |_| Ok(Some(same.clone())));
        notes
            .expect_save()
            .withf(|n| n.ticket() == 512 && n.text() == "moved")
            .times(1)
            .returning(|_| Ok(()));
        let use_case = UpdateNoteUseCase::new(Arc::new(notes), Arc::new(users), Arc::new(animals));

        let response = use_case
            .execute(&UpdateNoteRequest {
                id: Some(id.to_string()),
                user: Some(UserId::new().to_string()),
                animal: Some(AnimalId::new().to_string()),
                title: Some("Vet visit".into()),
                text: Some("moved".into()),
            })
            .await
            .unwrap();

        assert_eq!(response.message, "'Vet visit' updated");
    }

    #[tokio::test]
    async fn test_delete_note() {
        let existing = Note::new(UserId::new(), AnimalId::new(), "Vet visit", "t", 500);
        let id = *existing.id();
        let mut notes = MockNoteRepository::new();
        notes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        notes.expect_delete().times(1).returning(|_| Ok(()));
        let use_case = DeleteNoteUseCase::new(Arc::new(notes));

        let response = use_case
            .execute(&DeleteByIdRequest {
                id: Some(id.to_string()),
            })
            .await
            .unwrap();

        assert_eq!(
            response.message,
            format!("Note 'Vet visit' with ID {} deleted", id)
        );
    }

    #[tokio::test]
    async fn test_list_attaches_usernames() {
        let user = User::new("dave", "h".into(), vec![]);
        let user_id = *user.id();
        let mut users = MockUserRepository::new();
        users.expect_list().returning(move || Ok(vec![user.clone()]));
        let mut notes = MockNoteRepository::new();
        notes.expect_list().returning(move || {
            Ok(vec![Note::new(user_id, AnimalId::new(), "Vet visit", "t", 500)])
        });
        let use_case = ListNotesUseCase::new(Arc::new(notes), Arc::new(users));

        let listed = use_case.execute().await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].username.as_deref(), Some("dave"));
    }
}
