use std::sync::Arc;

use tracing::{info, warn};

use crate::application::dto::AnimalDto;
use crate::application::errors::UseCaseError;
use crate::application::ports::{AnimalRepository, BlobStore, ImageRepository};
use crate::application::staging::StagedUpload;
use crate::domain::entities::{Animal, Image};
use crate::domain::validation::Validation;
use crate::domain::value_objects::{AnimalId, CollationKey};

const FIELDS_REQUIRED: &str = "Name and description fields are required";
const NAME_REQUIRED: &str = "Animal name required";
const DUPLICATE_NAME: &str = "Duplicate animal name";
const NOT_FOUND: &str = "Animal not found";

/// Animal form submitted by a client, optionally with an image
#[derive(Debug, Default)]
pub struct AnimalSubmission {
    pub name: String,
    pub description: String,
    pub caption: Option<String>,
    pub file: Option<StagedUpload>,
}

impl AnimalSubmission {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_image(mut self, file: StagedUpload, caption: Option<String>) -> Self {
        self.file = Some(file);
        self.caption = caption;
        self
    }
}

/// What a lifecycle operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Created,
    CreatedWithImage,
    Updated { name: String },
    UpdatedWithImage { name: String },
    Deleted { name: String },
    DeletedWithImages { name: String },
}

impl LifecycleOutcome {
    /// Client-facing confirmation message
    pub fn message(&self) -> String {
        match self {
            Self::Created => "New animal created.".to_string(),
            Self::CreatedWithImage => "New animal created with image.".to_string(),
            Self::Updated { name } => format!("Animal ({}) updated.", name),
            Self::UpdatedWithImage { name } => format!("Animal ({}) updated with new image.", name),
            Self::Deleted { name } => format!("Animal ({}) deleted.", name),
            Self::DeletedWithImages { name } => {
                format!("Animal ({}) deleted along with its images.", name)
            }
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created | Self::CreatedWithImage)
    }
}

/// Keeps animals, their image records and the stored blobs consistent.
///
/// Store calls within one operation are strictly sequential. Nothing is
/// rolled back once a mutating call succeeded; validation, conflict and
/// not-found failures happen before the first mutation.
pub struct AnimalLifecycleCoordinator {
    animal_repo: Arc<dyn AnimalRepository>,
    image_repo: Arc<dyn ImageRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl AnimalLifecycleCoordinator {
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

    pub async fn list(&self) -> Result<Vec<AnimalDto>, UseCaseError> {
        let animals = self.animal_repo.list().await?;
        Ok(animals.into_iter().map(AnimalDto::from).collect())
    }

    /// Create an animal, attaching the staged image when one was uploaded
    pub async fn create(
        &self,
        submission: AnimalSubmission,
    ) -> Result<LifecycleOutcome, UseCaseError> {
        let AnimalSubmission {
            name,
            description,
            caption,
            file,
        } = submission;

        if let Err(e) = Self::validate_fields(&name, &description) {
            discard(file).await;
            return Err(e);
        }
        let name = name.trim();
        let description = description.trim();

        let duplicate = match self
            .animal_repo
            .find_by_name_key(&CollationKey::new(name))
            .await
        {
            Ok(found) => found,
            Err(e) => {
                discard(file).await;
                return Err(e.into());
            }
        };
        if duplicate.is_some() {
            discard(file).await;
            return Err(UseCaseError::conflict(DUPLICATE_NAME));
        }

        let animal = Animal::new(name, description);
        if let Err(e) = self.animal_repo.create(&animal).await {
            discard(file).await;
            return Err(e.into());
        }
        info!(animal_id = %animal.id(), "Animal {} created", animal.name());

        match file {
            Some(file) => {
                self.attach_image(&animal, file, caption).await?;
                Ok(LifecycleOutcome::CreatedWithImage)
            }
            None => Ok(LifecycleOutcome::Created),
        }
    }

    /// Overwrite the animal currently named `target_name` (or the submitted
    /// name when no target is given). A staged image is added alongside the
    /// existing ones.
    pub async fn update(
        &self,
        target_name: Option<&str>,
        submission: AnimalSubmission,
    ) -> Result<LifecycleOutcome, UseCaseError> {
        let AnimalSubmission {
            name,
            description,
            caption,
            file,
        } = submission;

        if let Err(e) = Self::validate_fields(&name, &description) {
            discard(file).await;
            return Err(e);
        }
        let name = name.trim();
        let description = description.trim();
        let lookup = target_name
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(name);

        let mut animal = match self.animal_repo.find_by_name(lookup).await {
            Ok(Some(animal)) => animal,
            Ok(None) => {
                discard(file).await;
                return Err(UseCaseError::not_found(NOT_FOUND));
            }
            Err(e) => {
                discard(file).await;
                return Err(e.into());
            }
        };

        // Renames are not checked against other animals' names
        animal.update_details(name, description);
        if let Err(e) = self.animal_repo.save(&animal).await {
            discard(file).await;
            return Err(e.into());
        }
        info!(animal_id = %animal.id(), "Animal {} updated", animal.name());

        let updated_name = animal.name().to_string();
        match file {
            Some(file) => {
                self.attach_image(&animal, file, caption).await?;
                Ok(LifecycleOutcome::UpdatedWithImage { name: updated_name })
            }
            None => Ok(LifecycleOutcome::Updated { name: updated_name }),
        }
    }

    /// Delete the animal with this exact name together with its images and blobs
    pub async fn delete(&self, name: &str) -> Result<LifecycleOutcome, UseCaseError> {
        if Validation::is_blank(name) {
            return Err(UseCaseError::validation(NAME_REQUIRED));
        }

        let animal = self
            .animal_repo
            .find_by_name(name.trim())
            .await?
            .ok_or_else(|| UseCaseError::not_found(NOT_FOUND))?;

        let images = self.image_repo.find_by_animal(animal.id()).await?;
        for image in &images {
            if let Err(e) = self.blob_store.delete(image.path()).await {
                warn!(
                    image_id = %image.id(),
                    "Failed to delete blob {} for animal {}: {}",
                    image.path(),
                    animal.name(),
                    e
                );
            }
            self.image_repo.delete(image.id()).await?;
        }

        self.animal_repo.delete(animal.id()).await?;
        info!(
            animal_id = %animal.id(),
            images = images.len(),
            "Animal {} deleted",
            animal.name()
        );

        let name = animal.name().to_string();
        if images.is_empty() {
            Ok(LifecycleOutcome::Deleted { name })
        } else {
            Ok(LifecycleOutcome::DeletedWithImages { name })
        }
    }

    async fn attach_image(
        &self,
        animal: &Animal,
        file: StagedUpload,
        caption: Option<String>,
    ) -> Result<Image, UseCaseError> {
        store_image(
            self.blob_store.as_ref(),
            self.image_repo.as_ref(),
            *animal.id(),
            file,
            caption,
        )
        .await
    }

    fn validate_fields(name: &str, description: &str) -> Result<(), UseCaseError> {
        Validation::require_fields(
            &[("name", name), ("description", description)],
            FIELDS_REQUIRED,
        )
        .map_err(UseCaseError::from)
    }
}

/// Store the blob, then record it. A record failure removes the stored blob
/// again; the owning animal is left as it is.
pub(super) async fn store_image(
    blob_store: &dyn BlobStore,
    image_repo: &dyn ImageRepository,
    animal: AnimalId,
    file: StagedUpload,
    caption: Option<String>,
) -> Result<Image, UseCaseError> {
    let key = match blob_store.store(&file).await {
        Ok(key) => key,
        Err(e) => {
            file.discard().await;
            return Err(e.into());
        }
    };
    file.discard().await;

    let image = Image::new(animal, key, caption);
    if let Err(e) = image_repo.create(&image).await {
        if let Err(cleanup) = blob_store.delete(image.path()).await {
            warn!(
                "Failed to remove orphaned blob {}: {}",
                image.path(),
                cleanup
            );
        }
        return Err(e.into());
    }

    info!(image_id = %image.id(), animal_id = %animal, "Image stored at {}", image.path());
    Ok(image)
}

pub(super) async fn discard(file: Option<StagedUpload>) {
    if let Some(file) = file {
        file.discard().await;
    }
}
