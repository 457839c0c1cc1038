use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything a request can fail with. Recovered into a JSON error response
/// at the HTTP boundary; nothing here aborts the process.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or empty required field, enum violation, malformed identifier,
    /// or an unparseable request body.
    #[error("{0}")]
    Validation(String),

    /// Unique-constraint violation (users.email, devices.serial_number).
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// A reference field whose value is not a well-formed id.
    #[error("{0} is not a valid id")]
    InvalidReference(&'static str),

    /// A well-formed reference with no matching record.
    #[error("{0} does not exist")]
    DanglingReference(&'static str),

    /// A reference to a sensor that exists but is not active.
    #[error("{0} refers to an inactive sensor")]
    InactiveReference(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Deletion blocked because dependent records still reference the target.
    #[error("cannot delete {entity}: {count} {dependents} still reference it")]
    HasDependents {
        entity: &'static str,
        dependents: &'static str,
        count: i64,
    },

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidReference(_)
            | AppError::DanglingReference(_)
            | AppError::InactiveReference(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::HasDependents { .. } => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Storage(e) => {
                error!(error = %e, "storage error");
                // Full detail only in debug builds; release builds stay opaque.
                if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    "internal server error".to_owned()
                }
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Maps a unique-constraint violation onto `Conflict(field)`, passing any
/// other database error through as `Storage`.
pub fn unique_conflict(field: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(field),
        _ => AppError::Storage(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        assert_eq!(
            AppError::Validation("name is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InvalidReference("ownerId").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DanglingReference("zoneId").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InactiveReference("sensorId").status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflicts_map_to_conflict() {
        assert_eq!(AppError::Conflict("email").status(), StatusCode::CONFLICT);
        let blocked = AppError::HasDependents {
            entity: "user",
            dependents: "devices",
            count: 2,
        };
        assert_eq!(blocked.status(), StatusCode::CONFLICT);
        assert_eq!(
            blocked.to_string(),
            "cannot delete user: 2 devices still reference it"
        );
    }

    #[test]
    fn not_found_and_storage() {
        assert_eq!(AppError::NotFound("zone").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Storage(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
