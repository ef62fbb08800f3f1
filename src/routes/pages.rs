use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;
use tera::Tera;

use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::pages::{
    show_index as show_index_service, show_post as show_post_service,
    show_references as show_references_service,
};

#[derive(Deserialize)]
struct IndexQueryParams {
    page: Option<usize>,
    tag: Option<String>,
}

#[get("/")]
pub async fn show_index(
    params: web::Query<IndexQueryParams>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);
    match show_index_service(page, params.tag.as_deref(), repo.get_ref()) {
        Ok(posts) => {
            let mut context = base_context(&config.site_title, "index");
            context.insert("posts", &posts);
            context.insert("tag", &params.tag);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render index: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/{slug}")]
pub async fn show_post(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_post_service(&slug.into_inner(), repo.get_ref()) {
        Ok(page) => {
            let mut context = base_context(&config.site_title, "post");
            context.insert("post", &page.post);
            context.insert("content", &page.content);
            context.insert("toc", &page.toc);
            context.insert("related", &page.related);
            render_template(&tera, "posts/detail.html", &context)
        }
        Err(ServiceError::NotFound) => redirect("/"),
        Err(err) => {
            log::error!("Failed to render post: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Deserialize)]
struct ReferencesQueryParams {
    tag: Option<String>,
}

#[get("/references")]
pub async fn show_references(
    params: web::Query<ReferencesQueryParams>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_references_service(params.tag.as_deref(), repo.get_ref()) {
        Ok(references) => {
            let mut context = base_context(&config.site_title, "references");
            context.insert("references", &references);
            render_template(&tera, "references/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render references: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
