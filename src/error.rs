// src/error.rs
use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised by an `EntityStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Classifies constraint violations reported by the database so callers can
    /// react to them without inspecting driver errors.
    pub fn classify(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Outcome of a rejected poll, vote or results request.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Poll is closed for voting.")]
    PollClosed,

    #[error("Option does not belong to this poll.")]
    InvalidOption,

    #[error("You have already voted on this poll.")]
    DuplicateVote,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type PollResult<T> = Result<T, PollError>;

// Undecodable request bodies are malformed input like any other.
impl From<JsonRejection> for PollError {
    fn from(rejection: JsonRejection) -> Self {
        PollError::Validation(rejection.body_text())
    }
}

impl PollError {
    pub fn status(&self) -> StatusCode {
        match self {
            PollError::NotFound(_) => StatusCode::NOT_FOUND,
            PollError::PollClosed | PollError::InvalidOption | PollError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            PollError::DuplicateVote => StatusCode::CONFLICT,
            PollError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PollError::NotFound(_) => "NOT_FOUND",
            PollError::PollClosed => "POLL_CLOSED",
            PollError::InvalidOption => "INVALID_OPTION",
            PollError::DuplicateVote => "DUPLICATE_VOTE",
            PollError::Validation(_) => "VALIDATION_ERROR",
            PollError::Storage(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for PollError {
    fn into_response(self) -> Response {
        let message = match &self {
            PollError::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            message,
        };

        (self.status(), Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_distinct_codes() {
        let errors = [
            PollError::NotFound("Poll".into()),
            PollError::PollClosed,
            PollError::InvalidOption,
            PollError::DuplicateVote,
            PollError::Validation("bad".into()),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert_eq!(PollError::DuplicateVote.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn storage_errors_hide_driver_detail() {
        let err = PollError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn non_database_errors_are_not_constraint_violations() {
        let err = StoreError::classify(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
    }
}
