//! Image upload wrappers for recipe photos and avatars.

use std::sync::Arc;
use uuid::Uuid;

use plateshare_core::PlateshareClient;

use crate::error::AppError;

/// Maximum size of one uploaded image (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Maximum images attached to one recipe.
pub const MAX_RECIPE_IMAGES: usize = 5;

const RECIPE_BUCKET: &str = "recipe-images";
const AVATAR_BUCKET: &str = "avatars";

/// One file picked by the user.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Validate an image file locally: content type and size.
pub fn validate_image(file: &ImageFile) -> Result<(), AppError> {
    if !file.content_type.starts_with("image/") {
        return Err(AppError::validation(format!(
            "{} is not an image",
            file.file_name
        )));
    }
    if file.data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::validation(format!(
            "{} is larger than 5MB",
            file.file_name
        )));
    }
    Ok(())
}

fn extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or("jpg")
}

/// Uploads for recipe photos and avatars.
pub struct ImageService {
    client: Arc<PlateshareClient>,
}

impl ImageService {
    pub fn new(client: Arc<PlateshareClient>) -> Self {
        Self { client }
    }

    /// Upload recipe images under generated unique names and return
    /// their public URLs in upload order. `existing` counts images
    /// already attached, so the per-recipe cap holds across edits.
    pub async fn upload_recipe_images(
        &self,
        files: Vec<ImageFile>,
        existing: usize,
    ) -> Result<Vec<String>, AppError> {
        self.client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        if existing + files.len() > MAX_RECIPE_IMAGES {
            return Err(AppError::validation(format!(
                "You can only upload up to {} images",
                MAX_RECIPE_IMAGES
            )));
        }
        for file in &files {
            validate_image(file)?;
        }

        let storage = self.client.storage(RECIPE_BUCKET);
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let path = format!("{}.{}", Uuid::new_v4(), extension(&file.file_name));
            storage
                .upload(&path, file.data, &file.content_type, false)
                .await?;
            urls.push(storage.public_url(&path));
        }
        Ok(urls)
    }

    /// Upload the signed-in user's avatar at its fixed per-user path,
    /// replacing any previous one, and return its public URL.
    pub async fn upload_avatar(&self, file: ImageFile) -> Result<String, AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        validate_image(&file)?;

        let storage = self.client.storage(AVATAR_BUCKET);
        let path = format!("{}/avatar.{}", session.user.id, extension(&file.file_name));
        storage
            .upload(&path, file.data, &file.content_type, true)
            .await?;
        Ok(storage.public_url(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str, len: usize) -> ImageFile {
        ImageFile {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            data: vec![0; len],
        }
    }

    #[test]
    fn test_validate_rejects_non_images() {
        let file = ImageFile {
            file_name: "notes.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![0; 10],
        };
        assert!(matches!(
            validate_image(&file),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_images() {
        let file = png("huge.png", MAX_IMAGE_BYTES + 1);
        assert!(matches!(
            validate_image(&file),
            Err(AppError::Validation(_))
        ));
        assert!(validate_image(&png("ok.png", 1024)).is_ok());
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(extension("photo.webp"), "webp");
        assert_eq!(extension("noext"), "noext");
    }
}
