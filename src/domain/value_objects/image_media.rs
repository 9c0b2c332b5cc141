use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::errors::DomainError;

static ALLOWED_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpe?g|png)$").expect("Invalid extension regex"));

/// Image formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            _ => None,
        }
    }
}

/// Verified media description of an uploaded image.
///
/// Both the file extension and the declared content type must name the same
/// accepted format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMedia {
    format: ImageFormat,
    extension: String,
}

impl ImageMedia {
    pub fn from_parts(file_name: &str, declared_content_type: &str) -> Result<Self, DomainError> {
        let extension = ALLOWED_EXTENSION
            .find(file_name)
            .map(|m| m.as_str().to_lowercase())
            .ok_or_else(|| {
                DomainError::UnsupportedMedia(
                    "Only .png, .jpg and .jpeg files are allowed".to_string(),
                )
            })?;

        let declared = declared_content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        let format = ImageFormat::from_mime(&declared).ok_or_else(|| {
            DomainError::UnsupportedMedia(format!("Content type {} is not allowed", declared))
        })?;

        let guessed = mime_guess::from_path(file_name)
            .first_raw()
            .and_then(ImageFormat::from_mime);
        if guessed != Some(format) {
            return Err(DomainError::UnsupportedMedia(format!(
                "File extension {} does not match content type {}",
                extension, declared
            )));
        }

        Ok(Self { format, extension })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Lowercased extension including the leading dot, e.g. `.png`
    pub fn extension(&self) -> &str {
        &self.extension
    }
}
