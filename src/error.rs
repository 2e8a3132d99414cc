use actix_web::{HttpResponse, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Business failures the presentation layer translates into user-facing
/// responses. Storage errors are the only 5xx path.
#[derive(Debug, Display)]
pub enum ApiError {
    /// An open session already exists for the employee.
    #[display(fmt = "{}", _0)]
    Conflict(String),

    /// No open session / unknown request id.
    #[display(fmt = "{}", _0)]
    NotFound(String),

    /// Malformed variant payload, missing rejection reason, bad time ordering.
    #[display(fmt = "{}", _0)]
    Validation(String),

    /// Transition attempted on a non-pending request.
    #[display(fmt = "{}", _0)]
    InvalidState(String),

    /// Non-admin caller on an admin-only operation.
    #[display(fmt = "{}", _0)]
    Authorization(String),

    #[display(fmt = "Internal Server Error")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Conflict(_) | ApiError::InvalidState(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authorization(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Database(e) = self {
            tracing::error!(error = %e, "Storage failure");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
