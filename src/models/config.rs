use serde::Deserialize;

/// Server configuration, loaded from an optional YAML file with
/// environment-variable overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Path or URL of the SQLite database.
    pub database_url: String,
    /// Interface the HTTP server binds to.
    pub bind_address: String,
    pub port: u16,
    /// Directory uploaded images are written into.
    pub upload_dir: String,
    /// Public URL prefix under which uploads are served.
    pub upload_base_url: String,
    /// Glob passed to Tera for template discovery.
    pub templates_glob: String,
    /// Title rendered in page headers.
    pub site_title: String,
}

impl ServerConfig {
    /// Load configuration from `tinta.yaml` (optional) and `TINTA_*`
    /// environment variables, with development-friendly defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("database_url", "blog.db")?
            .set_default("bind_address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("upload_dir", "uploads")?
            .set_default("upload_base_url", "/uploads")?
            .set_default("templates_glob", "templates/**/*.html")?
            .set_default("site_title", "tinta")?
            .add_source(config::File::with_name("tinta").required(false))
            .add_source(config::Environment::with_prefix("TINTA"))
            .build()?
            .try_deserialize()
    }
}
