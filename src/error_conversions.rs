//! Error conversion glue between the form, service and HTTP layers.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::types::TypeConstraintError;
use crate::forms::import_export::UploadParseError;
use crate::forms::posts::PostFormError;
use crate::forms::references::ReferenceFormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<PostFormError> for ServiceError {
    fn from(val: PostFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<ReferenceFormError> for ServiceError {
    fn from(val: ReferenceFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<UploadParseError> for ServiceError {
    fn from(val: UploadParseError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

/// JSON error surface for the `/v1` API: every service error maps onto a
/// status code and an `{"error": ...}` body.
impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Form(_) => StatusCode::BAD_REQUEST,
            ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
