//! Multipart form reading for image uploads
//!
//! Text fields are collected by name. The `image` file field (or its legacy
//! names `multerimage` and `multer-image`) is streamed
//! chunk by chunk into the staging area, so an oversize or unsupported file
//! is rejected before it is fully received.

use std::collections::HashMap;

use axum::extract::multipart::{Field, Multipart};

use crate::api::errors::ApiError;
use crate::application::errors::UseCaseError;
use crate::application::staging::{StagedUpload, UploadStaging};

/// Name of the multipart field carrying the image file
pub const IMAGE_FIELD: &str = "image";

/// Older clients send the file under these names
const LEGACY_IMAGE_FIELDS: [&str; 2] = ["multerimage", "multer-image"];

fn is_image_field(name: &str) -> bool {
    name == IMAGE_FIELD || LEGACY_IMAGE_FIELDS.contains(&name)
}

/// Parsed multipart form
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    file: Option<StagedUpload>,
}

impl MultipartForm {
    /// Text field value, `None` when absent
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Take ownership of the staged file, if one was uploaded
    pub fn take_file(&mut self) -> Option<StagedUpload> {
        self.file.take()
    }
}

pub async fn read_multipart(
    staging: &UploadStaging,
    mut multipart: Multipart,
) -> Result<MultipartForm, ApiError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if is_image_field(&name) && field.file_name().is_some() {
            let staged = stage_field(staging, field).await?;
            // A repeated file field replaces the earlier one, whose guard cleans it up
            form.file = Some(staged);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

async fn stage_field(staging: &UploadStaging, mut field: Field<'_>) -> Result<StagedUpload, ApiError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();

    let mut writer = staging
        .begin(&file_name, &content_type)
        .await
        .map_err(UseCaseError::from)?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        writer.write_chunk(&chunk).await.map_err(UseCaseError::from)?;
    }

    Ok(writer.finish().await.map_err(UseCaseError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_field_names() {
        assert!(is_image_field("image"));
        assert!(is_image_field("multerimage"));
        assert!(is_image_field("multer-image"));
        assert!(!is_image_field("caption"));
        assert!(!is_image_field("Image"));
    }
}
