use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use scribe_crypto::PasswordError;
use scribe_db::DbError;
use scribe_types::api::ErrorResponse;

/// Every failure a handler can report. The display string is what the
/// client sees in the `error` field.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or empty, or the body is not JSON.
    #[error("{0}")]
    Validation(&'static str),

    /// A unique column already holds the value.
    #[error("{0}")]
    Conflict(String),

    /// Login with an unknown user or wrong password.
    #[error("Invalid credentials")]
    Authentication,

    /// No session on a route that needs one.
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Route not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Authentication | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(msg) => Self::Conflict(msg),
            other => {
                error!("storage error: {}", other);
                Self::Internal
            }
        }
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        error!("session error: {}", err);
        Self::Internal
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        error!("password hashing error: {}", err);
        Self::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::Validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Authentication.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn db_conflict_stays_a_conflict() {
        let err: ApiError = DbError::Conflict("UNIQUE constraint failed".into()).into();
        assert!(matches!(err, ApiError::Conflict(_)));
        let err: ApiError = DbError::LockPoisoned.into();
        assert!(matches!(err, ApiError::Internal));
    }
}
