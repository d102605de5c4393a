/// Database migration runner
///
/// Runs the embedded schema migrations (users, todos, sessions) using
/// sqlx's migration system. Migration files live in the `migrations/`
/// directory of this crate and are compiled into the binary with
/// `sqlx::migrate!`, so no files need to ship alongside the server.
///
/// # Example
///
/// ```no_run
/// use todue_shared::db::pool::{create_pool, DatabaseConfig};
/// use todue_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// Migrations that have already been applied are skipped, so this is safe
/// to call on every startup.
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the connection is
/// lost mid-migration.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database if it does not already exist
///
/// Useful for first boot and for test setup, where the target database may
/// not have been provisioned yet.
///
/// # Errors
///
/// Returns an error if the server is unreachable or the caller lacks
/// permission to create databases.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }
    Ok(())
}
