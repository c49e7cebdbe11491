use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A looked-up or referenced row does not exist. Carries a human-readable description.
    #[error("{0}")]
    NotFound(String),

    /// A read, write or commit failed. Any open transaction has been rolled back.
    #[error("Database error: {0}")]
    Persistence(#[source] sqlx::Error),

    #[error(transparent)]
    InvalidInput(#[from] CoreError),
}

impl DbError {
    pub(crate) fn not_found(entity: &str, id: i64) -> Self {
        DbError::NotFound(format!("{entity} {id} not found"))
    }
}

/// A foreign-key violation means the write named a row that does not exist,
/// which is a not-found condition rather than a storage failure.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DbError::NotFound("A referenced entity does not exist".to_string())
            }
            _ => DbError::Persistence(err),
        }
    }
}
