use crate::schema::ValidationErrors;
use crate::store::StoreError;
use crate::views;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Cast to ObjectId failed for value \"{0}\" at path \"_id\" for model \"Student\"")]
    MalformedId(String),

    #[error("No student with id {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// Every failure renders a full page. All of them share status 400.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let page = match &self {
            AppError::Validation(errors) => {
                warn!("Validation failed: {}", errors);
                views::student_save_failed(errors)
            }
            AppError::NotFound(id) => {
                warn!("Student not found: {}", id);
                views::student_not_found(id)
            }
            AppError::MalformedId(id) => {
                warn!("Malformed student id: {}", id);
                views::error_page(&self.to_string())
            }
            AppError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                views::error_page(&self.to_string())
            }
            AppError::Store(e) => {
                error!("Store error: {}", e);
                views::error_page(&self.to_string())
            }
        };

        (StatusCode::BAD_REQUEST, Html(page)).into_response()
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
