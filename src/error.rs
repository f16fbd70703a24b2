use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

use uuid::Uuid;

use crate::domain::ValidationErrors;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the domain, data access and notification layers
#[derive(Debug, Error)]
pub enum Error {
    // Parsing errors
    #[error("{0}")]
    ParsingError(String),
    // Form validation errors, keyed by field name
    #[error("Validation failed")]
    ValidationError(ValidationErrors),
    // Lookups against the store
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    // Notification errors
    #[error("Failed to send email: {0}")]
    SendEmailError(reqwest::Error),
    #[error("Failed to send WhatsApp message: {0}")]
    SendWhatsAppError(reqwest::Error),
    // Database errors
    #[error(transparent)]
    DatabaseError(#[from] sqlx::Error),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationError(errors)
    }
}

pub type RestResult<T> = std::result::Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Parse Error: {0}")]
    ParseError(String),

    #[error("Validation Error")]
    ValidationError(ValidationErrors),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Unauthorized Access: {0}")]
    Unauthorized(String),

    #[error("Internal Server Error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RestError {
    /// Message exposed to API clients
    fn public_message(&self) -> String {
        match self {
            Self::ParseError(msg)
            | Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::InternalError(msg) => msg.clone(),
            Self::ValidationError(_) => "Validation failed".into(),
            Self::Other(_) => "Internal server error".into(),
        }
    }
}

impl From<Error> for RestError {
    fn from(e: Error) -> Self {
        match e {
            Error::ParsingError(msg) => Self::ParseError(msg),
            Error::ValidationError(errors) => Self::ValidationError(errors),
            Error::NotFound { .. } => Self::NotFound(e.to_string()),
            Error::SendEmailError(_) => Self::InternalError("Failed to send email".into()),
            Error::SendWhatsAppError(_) => {
                Self::InternalError("Failed to send WhatsApp message".into())
            }
            Error::DatabaseError(error) => {
                tracing::error!(error.cause_chain = ?error, "Database operation failed");
                Self::InternalError("Database error".into())
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a ValidationErrors>,
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ParseError(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let fields = match self {
            Self::ValidationError(errors) => Some(errors),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.public_message(),
            fields,
        })
    }
}
