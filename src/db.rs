use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type MigrationError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Applied to every connection the pool hands out: sqlite only checks
/// `REFERENCES` when asked to, and waits on locks instead of failing with
/// SQLITE_BUSY when a busy timeout is set.
#[derive(Debug)]
struct ConnectionSettings;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionSettings {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn build_pool(database_url: &str, max_size: u32) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionSettings))
        .build(manager)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), MigrationError> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in applied {
        log::info!("Applied migration {}", version);
    }
    Ok(())
}

/// A single-connection in-memory store with the schema applied. Every
/// `:memory:` connection is its own database, so the pool must not grow.
#[cfg(test)]
pub fn test_pool() -> DbPool {
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connection_customizer(Box::new(ConnectionSettings))
        .build(ConnectionManager::<SqliteConnection>::new(":memory:"))
        .expect("Could not build test pool");
    run_migrations(&pool).expect("Could not migrate test database");
    pool
}
