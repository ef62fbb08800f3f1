use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use tera::Tera;

use tinta_blog::db::establish_connection_pool;
use tinta_blog::models::config::ServerConfig;
use tinta_blog::repository::DieselRepository;
use tinta_blog::routes::{api, pages};
use tinta_blog::services::images::LocalImageStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database pool: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let tera = match Tera::new(&config.templates_glob) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to load templates: {e}");
            std::process::exit(1);
        }
    };

    let image_store = match LocalImageStore::new(
        config.upload_dir.clone(),
        config.upload_base_url.clone(),
    ) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to prepare upload directory: {e}");
            std::process::exit(1);
        }
    };

    let bind_to = (config.bind_address.clone(), config.port);
    log::info!("Starting server on {}:{}", bind_to.0, bind_to.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(image_store.clone()))
            .service(pages::show_index)
            .service(pages::show_post)
            .service(pages::show_references)
            .service(api::api_v1_list_posts)
            .service(api::api_v1_create_post)
            .service(api::api_v1_download_posts)
            .service(api::api_v1_import_posts)
            .service(api::api_v1_get_post_by_slug)
            .service(api::api_v1_related_posts)
            .service(api::api_v1_get_post)
            .service(api::api_v1_update_post)
            .service(api::api_v1_delete_post)
            .service(api::api_v1_list_references)
            .service(api::api_v1_create_reference)
            .service(api::api_v1_get_reference_by_slug)
            .service(api::api_v1_get_reference)
            .service(api::api_v1_update_reference)
            .service(api::api_v1_delete_reference)
            .service(api::api_v1_upload_image)
            .service(Files::new(&config.upload_base_url, &config.upload_dir))
            .service(Files::new("/static", "static"))
    })
    .bind(bind_to)?
    .run()
    .await
}
