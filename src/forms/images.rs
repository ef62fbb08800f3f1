use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};

/// Multipart body accepted by `POST /v1/images`.
#[derive(MultipartForm)]
pub struct UploadImageForm {
    #[multipart(limit = "10MB")]
    pub image: TempFile,
    /// Slug of the post being edited; absent for unsaved drafts.
    pub post_slug: Option<Text<String>>,
}
