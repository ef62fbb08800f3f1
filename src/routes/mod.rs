use actix_web::HttpResponse;
use actix_web::http::header::LOCATION;
use tera::{Context, Tera};

pub mod api;
pub mod pages;

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

pub fn base_context(site_title: &str, current_page: &str) -> Context {
    let mut context = Context::new();
    context.insert("site_title", site_title);
    context.insert("current_page", current_page);
    context
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}
