use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::content::text::slugify;

use super::{ServiceError, ServiceResult};

/// Upload size cap, matching the multipart form limit.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised by image store backends.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for uploaded images.
///
/// The production deployment points this at object storage; the default
/// implementation writes to a local directory served as static files.
pub trait ImageStore {
    /// Persist the bytes under the given name and return the public URL.
    fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, ImageStoreError>;
}

/// [`ImageStore`] writing into a directory served under a URL prefix.
#[derive(Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base: String,
}

impl LocalImageStore {
    /// Create the store, ensuring the target directory exists.
    pub fn new(
        root: impl Into<PathBuf>,
        public_base: impl Into<String>,
    ) -> Result<Self, ImageStoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_base: public_base.into(),
        })
    }
}

impl ImageStore for LocalImageStore {
    fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, ImageStoreError> {
        std::fs::write(self.root.join(file_name), bytes)?;
        Ok(format!(
            "{}/{}",
            self.public_base.trim_end_matches('/'),
            file_name
        ))
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    pub url: String,
    pub file_name: String,
}

/// Validate and persist an uploaded image.
///
/// `post_slug` scopes the generated filename to the post being edited;
/// uploads from an unsaved draft fall back to a `draft-` prefix.
pub fn store_image<S>(
    original_name: &str,
    content_type: Option<&str>,
    bytes: &[u8],
    post_slug: Option<&str>,
    store: &S,
) -> ServiceResult<UploadedImage>
where
    S: ImageStore + ?Sized,
{
    if bytes.is_empty() {
        return Err(ServiceError::Form("no image file provided".to_string()));
    }
    if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
        return Err(ServiceError::Form(
            "only image files are allowed".to_string(),
        ));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ServiceError::Form(
            "file size too large, maximum is 10MB".to_string(),
        ));
    }

    let file_name = image_file_name(post_slug, original_name);
    match store.store(&file_name, bytes) {
        Ok(url) => Ok(UploadedImage { url, file_name }),
        Err(e) => {
            log::error!("Failed to store image: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Generate a unique, collision-free filename for an upload.
fn image_file_name(post_slug: Option<&str>, original_name: &str) -> String {
    let stem = post_slug
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "draft".to_string());
    let extension = Path::new(original_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "webp".to_string());

    format!("{stem}-{}.{extension}", Uuid::new_v4())
}
