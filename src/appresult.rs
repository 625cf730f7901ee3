use axum::{http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;

pub type AppResult<T> = Result<T, AppError>;
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

/// Requests turned away before they reach storage.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("missing caller identity")]
    Unauthenticated,
    #[error("admin role required")]
    Forbidden,
    #[error("bad request: {0}")]
    BadRequest(&'static str),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<StoreError>() {
            return match err {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::InvalidTable(_) => StatusCode::BAD_REQUEST,
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        match self.0.downcast_ref::<Rejection>() {
            Some(Rejection::Unauthenticated) => StatusCode::UNAUTHORIZED,
            Some(Rejection::Forbidden) => StatusCode::FORBIDDEN,
            Some(Rejection::BadRequest(_)) => StatusCode::BAD_REQUEST,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, backtrace = %self.0.backtrace(), "request failed");
        }
        (status, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let not_found = AppError::from(StoreError::NotFound("users".into()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad_table = AppError::from(StoreError::InvalidTable("x;y".into()));
        assert_eq!(bad_table.status(), StatusCode::BAD_REQUEST);

        let taken = AppError::from(StoreError::Conflict("a@x.com".into()));
        assert_eq!(taken.status(), StatusCode::CONFLICT);

        let storage = AppError::from(StoreError::Storage(sqlx::Error::PoolClosed));
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rejections_map_to_statuses() {
        assert_eq!(AppError::from(Rejection::Unauthenticated).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::from(Rejection::Forbidden).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::from(anyhow::anyhow!("boom")).into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
