use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Application-wide error taxonomy. Every failure a request can hit is
/// converted to one of these at the boundary and rendered as a structured
/// JSON body; nothing propagates as an unhandled fault.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid user ID format")]
    InvalidUserId,

    #[error("User not found or no follows available")]
    UserNotFound,

    #[error("No follows found for this user")]
    NoFollows,

    #[error("Comick API responded with status: {0}")]
    UpstreamStatus(u16),

    #[error("Failed to reach the Comick API: {0}")]
    UpstreamTransport(#[from] reqwest::Error),

    #[error("Failed to render feed: {0}")]
    Render(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidUserId => StatusCode::BAD_REQUEST,
            AppError::UserNotFound | AppError::NoFollows => StatusCode::NOT_FOUND,
            AppError::UpstreamStatus(_) | AppError::UpstreamTransport(_) | AppError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();

        match self {
            AppError::UpstreamStatus(_) | AppError::UpstreamTransport(_) | AppError::Render(_) => {
                log::error!("Server error: {:?}", self);
            }
            _ => {
                log::info!("Client error: {:?}", self);
            }
        }

        let body = if status.is_server_error() {
            json!({
                "error": "Failed to generate RSS feed",
                "details": self.to_string(),
            })
        } else {
            json!({ "error": self.to_string() })
        };

        HttpResponse::build(status).json(body)
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
