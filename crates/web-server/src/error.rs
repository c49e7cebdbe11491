use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(DbError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Malformed request body: {0}")]
    Body(#[from] JsonRejection),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(message) => AppError::NotFound(message),
            DbError::InvalidInput(invalid) => AppError::Validation(invalid.to_string()),
            other => AppError::Database(other),
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (StatusCode::INTERNAL_SERVER_ERROR, db_err.to_string())
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Body(rejection) => (rejection.status(), rejection.body_text()),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CoreError;

    #[test]
    fn repository_errors_map_to_status_codes() {
        let not_found = AppError::from(DbError::NotFound("Track 1 not found".to_string()));
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let invalid = AppError::from(DbError::InvalidInput(CoreError::InvalidInput(
            "length".to_string(),
            "must be positive, got 0".to_string(),
        )));
        assert_eq!(invalid.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let failed = AppError::from(DbError::Persistence(sqlx_error()));
        assert_eq!(failed.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn sqlx_error() -> database::sqlx::Error {
        database::sqlx::Error::PoolTimedOut
    }
}
