//! SQLite connection pooling helpers.

use diesel::SqliteConnection;
use diesel::r2d2::{self, ConnectionManager};

/// Shared r2d2 pool of SQLite connections.
pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
/// A single pooled connection checked out of a [`DbPool`].
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Build a connection pool for the given SQLite database path or URL.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder().build(manager)
}
