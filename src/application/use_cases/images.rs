use std::sync::Arc;

use tracing::{info, warn};

use super::animal_lifecycle::{discard, store_image};
use crate::application::dto::{DeleteByIdRequest, ImageDto, MessageResponse, UpdateImageRequest};
use crate::application::errors::UseCaseError;
use crate::application::ports::{AnimalRepository, BlobStore, ImageRepository};
use crate::application::staging::StagedUpload;
use crate::application::validation::{parse_id, present, require_all, validate_payload};
use crate::domain::value_objects::{AnimalId, ImageId};

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const ID_REQUIRED: &str = "Image ID required";
const NOT_FOUND: &str = "Image not found";

/// Use case: List every image record
pub struct ListImagesUseCase {
    image_repo: Arc<dyn ImageRepository>,
}

impl ListImagesUseCase {
    pub fn new(image_repo: Arc<dyn ImageRepository>) -> Self {
        Self { image_repo }
    }

    pub async fn execute(&self) -> Result<Vec<ImageDto>, UseCaseError> {
        let images = self.image_repo.list().await?;
        Ok(images.into_iter().map(ImageDto::from).collect())
    }
}

/// Use case: Attach a new image to an existing animal
pub struct CreateImageUseCase {
    animal_repo: Arc<dyn AnimalRepository>,
    image_repo: Arc<dyn ImageRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl CreateImageUseCase {
    pub fn new(
        animal_repo: Arc<dyn AnimalRepository>,
        image_repo: Arc<dyn ImageRepository>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            animal_repo,
            image_repo,
            blob_store,
        }
    }

    /// Animal id, caption and file are all required
    pub async fn execute(
        &self,
        animal_id: Option<String>,
        caption: Option<String>,
        file: Option<StagedUpload>,
    ) -> Result<MessageResponse, UseCaseError> {
        let (animal_id, caption, file) = match (present(&animal_id), present(&caption), file) {
            (Some(animal_id), Some(caption), Some(file)) => {
                (animal_id.to_string(), caption.to_string(), file)
            }
            (_, _, file) => {
                discard(file).await;
                return Err(UseCaseError::validation(ALL_FIELDS_REQUIRED));
            }
        };

        let animal_id: AnimalId = match parse_id(&animal_id, "animalID") {
            Ok(id) => id,
            Err(e) => {
                file.discard().await;
                return Err(e);
            }
        };

        match self.animal_repo.find_by_id(&animal_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                file.discard().await;
                return Err(UseCaseError::not_found("Animal not found"));
            }
            Err(e) => {
                file.discard().await;
                return Err(e.into());
            }
        }

        store_image(
            self.blob_store.as_ref(),
            self.image_repo.as_ref(),
            animal_id,
            file,
            Some(caption),
        )
        .await?;

        Ok(MessageResponse::new("New image created"))
    }
}

/// Use case: Change an image caption
pub struct UpdateImageUseCase {
    image_repo: Arc<dyn ImageRepository>,
}

impl UpdateImageUseCase {
    pub fn new(image_repo: Arc<dyn ImageRepository>) -> Self {
        Self { image_repo }
    }

    pub async fn execute(
        &self,
        request: &UpdateImageRequest,
    ) -> Result<MessageResponse, UseCaseError> {
        validate_payload(request)?;
        let [id, caption] = require_all([&request.id, &request.caption], ALL_FIELDS_REQUIRED)?;
        let id: ImageId = parse_id(id, "id")?;

        let mut image = self
            .image_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(NOT_FOUND))?;

        image.set_caption(caption);
        self.image_repo.save(&image).await?;

        Ok(MessageResponse::new(format!("Image with ID {} updated", id)))
    }
}

/// Use case: Delete an image record and its blob
pub struct DeleteImageUseCase {
    image_repo: Arc<dyn ImageRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl DeleteImageUseCase {
    pub fn new(image_repo: Arc<dyn ImageRepository>, blob_store: Arc<dyn BlobStore>) -> Self {
        Self {
            image_repo,
            blob_store,
        }
    }

    /// The blob goes first; a failure there is logged and the record is still removed
    pub async fn execute(
        &self,
        request: &DeleteByIdRequest,
    ) -> Result<MessageResponse, UseCaseError> {
        let [id] = require_all([&request.id], ID_REQUIRED)?;
        let id: ImageId = parse_id(id, "id")?;

        let image = self
            .image_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| UseCaseError::not_found(NOT_FOUND))?;

        if let Err(e) = self.blob_store.delete(image.path()).await {
            warn!(image_id = %id, "Failed to delete blob {}: {}", image.path(), e);
        }
        self.image_repo.delete(&id).await?;
        info!(image_id = %id, "Image deleted");

        Ok(MessageResponse::new(format!("Image with ID {} deleted", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockAnimalRepository, MockBlobStore, MockImageRepository, StorageError,
    };
    use crate::application::staging::UploadStaging;
    use crate::domain::entities::{Animal, Image};
    use crate::domain::value_objects::StorageKey;
    use tempfile::TempDir;

    fn image() -> Image {
        Image::new(
            AnimalId::new(),
            StorageKey::new("images/1.png").unwrap(),
            Some("old".to_string()),
        )
    }

    #[tokio::test]
    async fn test_create_requires_every_field() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let file = UploadStaging::new(dir.path(), 64)
            .stage_bytes("a.png", "image/png", b"x")
            .await
            .unwrap();
        let path = file.path().to_path_buf();
        let use_case = CreateImageUseCase::new(
            Arc::new(MockAnimalRepository::new()),
            Arc::new(MockImageRepository::new()),
            Arc::new(MockBlobStore::new()),
        );

        // Act
        let result = use_case
            .execute(Some(AnimalId::new().to_string()), None, Some(file))
            .await;

        // Assert
        assert!(matches!(result, Err(UseCaseError::Validation(m)) if m == "All fields are required"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_create_for_unknown_animal() {
        let dir = TempDir::new().unwrap();
        let file = UploadStaging::new(dir.path(), 64)
            .stage_bytes("a.png", "image/png", b"x")
            .await
            .unwrap();
        let mut animals = MockAnimalRepository::new();
        animals.expect_find_by_id().returning(|_| Ok(None));
        let mut blobs = MockBlobStore::new();
        blobs.expect_store().times(0);
        let use_case = CreateImageUseCase::new(
            Arc::new(animals),
            Arc::new(MockImageRepository::new()),
            Arc::new(blobs),
        );

        let result = use_case
            .execute(
                Some(AnimalId::new().to_string()),
                Some("caption".into()),
                Some(file),
            )
            .await;

        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_success() {
        let dir = TempDir::new().unwrap();
        let file = UploadStaging::new(dir.path(), 64)
            .stage_bytes("a.jpg", "image/jpeg", b"x")
            .await
            .unwrap();
        let animal = Animal::new("Rex", "A dog");
        let animal_id = *animal.id();
        let mut animals = MockAnimalRepository::new();
        animals
            .expect_find_by_id()
            .returning(move |_| Ok(Some(animal.clone())));
        let mut blobs = MockBlobStore::new();
        blobs
            .expect_store()
            .returning(|_| Ok(StorageKey::new("images/2.jpg").unwrap()));
        let mut images = MockImageRepository::new();
        images
            .expect_create()
            .withf(move |i| *i.animal() == animal_id && i.caption() == "Rex at play")
            .times(1)
            .returning(|_| Ok(()));
        let use_case = CreateImageUseCase::new(Arc::new(animals), Arc::new(images), Arc::new(blobs));

        let response = use_case
            .execute(
                Some(animal_id.to_string()),
                Some("Rex at play".into()),
                Some(file),
            )
            .await
            .unwrap();

        assert_eq!(response.message, "New image created");
    }

    #[tokio::test]
    async fn test_update_caption() {
        let existing = image();
        let id = *existing.id();
        let mut images = MockImageRepository::new();
        images
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        images
            .expect_save()
            .withf(|i| i.caption() == "new")
            .times(1)
            .returning(|_| Ok(()));
        let use_case = UpdateImageUseCase::new(Arc::new(images));

        let response = use_case
            .execute(&UpdateImageRequest {
                id: Some(id.to_string()),
                caption: Some("new".into()),
            })
            .await
            .unwrap();

        assert_eq!(response.message, format!("Image with ID {} updated", id));
    }

    #[tokio::test]
    async fn test_update_missing_image() {
        let mut images = MockImageRepository::new();
        images.expect_find_by_id().returning(|_| Ok(None));
        let use_case = UpdateImageUseCase::new(Arc::new(images));

        let result = use_case
            .execute(&UpdateImageRequest {
                id: Some(ImageId::new().to_string()),
                caption: Some("new".into()),
            })
            .await;

        assert!(matches!(result, Err(UseCaseError::NotFound(m)) if m == "Image not found"));
    }

    #[tokio::test]
    async fn test_delete_removes_record_even_if_blob_fails() {
        let existing = image();
        let id = *existing.id();
        let mut images = MockImageRepository::new();
        images
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        images.expect_delete().times(1).returning(|_| Ok(()));
        let mut blobs = MockBlobStore::new();
        blobs
            .expect_delete()
            .times(1)
            .returning(|_| Err(StorageError::NotFound("images/1.png".into())));
        let use_case = DeleteImageUseCase::new(Arc::new(images), Arc::new(blobs));

        let response = use_case
            .execute(&DeleteByIdRequest {
                id: Some(id.to_string()),
            })
            .await
            .unwrap();

        assert_eq!(response.message, format!("Image with ID {} deleted", id));
    }

    #[tokio::test]
    async fn test_delete_requires_id() {
        let use_case = DeleteImageUseCase::new(
            Arc::new(MockImageRepository::new()),
            Arc::new(MockBlobStore::new()),
        );

        let result = use_case.execute(&DeleteByIdRequest { id: None }).await;

        assert!(matches!(result, Err(UseCaseError::Validation(m)) if m == "Image ID required"));
    }
}
