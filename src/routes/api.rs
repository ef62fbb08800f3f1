use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::post::PostUpdate;
use crate::domain::reference::ReferenceUpdate;
use crate::domain::types::ReferenceFormat;
use crate::forms::images::UploadImageForm;
use crate::forms::import_export::{UploadFormat, UploadImportForm, parse_posts_upload};
use crate::forms::posts::{CreatePostForm, CreatePostPayload, UpdatePostForm};
use crate::forms::references::{CreateReferenceForm, CreateReferencePayload, UpdateReferenceForm};
use crate::repository::DieselRepository;
use crate::services::images::{LocalImageStore, store_image};
use crate::services::import_export::{DownloadFormat, download_posts, import_posts};
use crate::services::{ServiceError, posts, references};

#[derive(Deserialize, Debug)]
struct PostsQueryParams {
    tag: Option<String>,
    search: Option<String>,
}

#[get("/v1/posts")]
pub async fn api_v1_list_posts(
    params: web::Query<PostsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let posts = posts::list_posts(
        params.tag.as_deref(),
        params.search.as_deref(),
        repo.get_ref(),
    )?;
    Ok(HttpResponse::Ok().json(posts))
}

#[post("/v1/posts")]
pub async fn api_v1_create_post(
    form: web::Json<CreatePostForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let payload = CreatePostPayload::try_from(form.into_inner())?;
    let post = posts::create_post(payload, repo.get_ref())?;
    Ok(HttpResponse::Created().json(post))
}

#[derive(Deserialize, Debug)]
struct DownloadQueryParams {
    format: String,
}

#[get("/v1/posts/download")]
pub async fn api_v1_download_posts(
    params: web::Query<DownloadQueryParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let format = DownloadFormat::try_from(params.format.as_str())
        .map_err(|e| ServiceError::Form(e.to_string()))?;
    let file = download_posts(format, repo.get_ref())?;
    Ok(HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file.file_name),
        ))
        .body(file.bytes))
}

#[post("/v1/posts/import")]
pub async fn api_v1_import_posts(
    MultipartForm(form): MultipartForm<UploadImportForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let format = UploadFormat::try_from(form.format.as_str())?;
    let rows = parse_posts_upload(form.file.file.path(), format)?;
    let report = import_posts(rows, repo.get_ref());
    Ok(HttpResponse::Ok().json(report))
}

#[get("/v1/posts/slug/{slug}")]
pub async fn api_v1_get_post_by_slug(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let post = posts::get_post_by_slug(&slug.into_inner(), repo.get_ref())?;
    Ok(HttpResponse::Ok().json(post))
}

#[get("/v1/posts/{id}")]
pub async fn api_v1_get_post(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let post = posts::get_post(id.into_inner(), repo.get_ref())?;
    Ok(HttpResponse::Ok().json(post))
}

#[put("/v1/posts/{id}")]
pub async fn api_v1_update_post(
    id: web::Path<i32>,
    form: web::Json<UpdatePostForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let update = PostUpdate::try_from(form.into_inner())?;
    let post = posts::update_post(id.into_inner(), update, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(post))
}

#[delete("/v1/posts/{id}")]
pub async fn api_v1_delete_post(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    posts::delete_post(id.into_inner(), repo.get_ref())?;
    Ok(HttpResponse::Ok().json(json!({ "message": "post deleted" })))
}

#[derive(Deserialize, Debug)]
struct RelatedQueryParams {
    limit: Option<usize>,
}

#[get("/v1/posts/{id}/related")]
pub async fn api_v1_related_posts(
    id: web::Path<i32>,
    params: web::Query<RelatedQueryParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let related = posts::related_posts(id.into_inner(), params.limit, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(related))
}

#[derive(Deserialize, Debug)]
struct ReferencesQueryParams {
    tag: Option<String>,
    format: Option<String>,
}

#[get("/v1/references")]
pub async fn api_v1_list_references(
    params: web::Query<ReferencesQueryParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let format = params
        .format
        .as_deref()
        .map(ReferenceFormat::try_from)
        .transpose()
        .map_err(|e| ServiceError::Form(e.to_string()))?;
    let references =
        references::list_references(params.tag.as_deref(), format, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(references))
}

#[post("/v1/references")]
pub async fn api_v1_create_reference(
    form: web::Json<CreateReferenceForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let payload = CreateReferencePayload::try_from(form.into_inner())?;
    let reference = references::create_reference(payload, repo.get_ref())?;
    Ok(HttpResponse::Created().json(reference))
}

#[get("/v1/references/slug/{slug}")]
pub async fn api_v1_get_reference_by_slug(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let reference = references::get_reference_by_slug(&slug.into_inner(), repo.get_ref())?;
    Ok(HttpResponse::Ok().json(reference))
}

#[get("/v1/references/{id}")]
pub async fn api_v1_get_reference(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let reference = references::get_reference(id.into_inner(), repo.get_ref())?;
    Ok(HttpResponse::Ok().json(reference))
}

#[put("/v1/references/{id}")]
pub async fn api_v1_update_reference(
    id: web::Path<i32>,
    form: web::Json<UpdateReferenceForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let update = ReferenceUpdate::try_from(form.into_inner())?;
    let reference = references::update_reference(id.into_inner(), update, repo.get_ref())?;
    Ok(HttpResponse::Ok().json(reference))
}

#[delete("/v1/references/{id}")]
pub async fn api_v1_delete_reference(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    references::delete_reference(id.into_inner(), repo.get_ref())?;
    Ok(HttpResponse::Ok().json(json!({ "message": "reference deleted" })))
}

#[post("/v1/images")]
pub async fn api_v1_upload_image(
    MultipartForm(form): MultipartForm<UploadImageForm>,
    store: web::Data<LocalImageStore>,
) -> Result<HttpResponse, ServiceError> {
    let bytes = std::fs::read(form.image.file.path()).map_err(|e| {
        log::error!("Failed to read uploaded image: {e}");
        ServiceError::Internal
    })?;

    let uploaded = store_image(
        form.image.file_name.as_deref().unwrap_or("upload"),
        form.image.content_type.as_ref().map(|m| m.essence_str()),
        &bytes,
        form.post_slug.as_deref().map(|s| s.as_str()),
        store.get_ref(),
    )?;

    Ok(HttpResponse::Ok().json(uploaded))
}
