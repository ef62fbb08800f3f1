pub mod images;
pub mod import_export;
pub mod posts;
pub mod references;
