use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

/// Establishes a connection pool to the SQLite database described by `settings`.
///
/// The database file is created if it does not exist, foreign keys are
/// enforced on every connection, and file-backed stores run in WAL mode so
/// readers never block the single writer. Each repository call checks a
/// connection out of this pool for the duration of its own unit of work only.
pub async fn connect(settings: &DatabaseSettings) -> Result<SqlitePool, DbError> {
    let in_memory = settings.url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(&settings.url)
        .map_err(DbError::ConnectionError)?
        .create_if_missing(true)
        .foreign_keys(true)
        // Writers queue on the lock for this long before reporting busy.
        .busy_timeout(Duration::from_secs(5));

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout());

    if in_memory {
        // An in-memory database lives only as long as its connection.
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    } else {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(DbError::ConnectionError)?;

    tracing::info!(url = %settings.url, max_connections = settings.max_connections, "Database pool ready.");
    Ok(pool)
}

/// Applies the embedded migrations, creating the catalog tables and the
/// track/artist join table when missing.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
