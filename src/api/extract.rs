use axum::extract::{rejection::JsonRejection, FromRequest, Request};

use crate::errors::AppError;

/// `axum::Json` with the rejection folded into our error taxonomy, so a
/// missing required field or an out-of-set enum value comes back as the
/// same `{"error": ...}` shape as every other validation failure.
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}
