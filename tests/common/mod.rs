//! Shared fixtures for integration tests.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;
use tinta_blog::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// A throwaway SQLite database with all migrations applied.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("temp database file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("SQLite pool");
        let mut conn = pool.get().expect("pooled connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("migrations should apply");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
