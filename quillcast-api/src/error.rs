//! Error handling for the API server.
//!
//! A single [`ApiError`] enum carries the HTTP status for every failure a
//! service can raise (404 not-found, 400 bad-identifier, 403 forbidden, 409
//! conflict, ...) and converts into the uniform response envelope with
//! `success: false`. Handlers return [`ApiResult<T>`] and use `?` to
//! propagate.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clients::{payments::GatewayError, storage::StorageError, tts::TtsError};
use crate::pipeline::extract::ExtractError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400), e.g. malformed identifiers
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403), e.g. deleting your own account
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. duplicate email or taken public handle
    Conflict(String),

    /// Unprocessable entity (422), request validation failures
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error envelope: the same shape as a success response, with
/// `success: false` and validation details (when present) in `data`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,

    #[serde(rename = "statusCode")]
    pub status_code: u16,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorEnvelope {
            success: false,
            status_code: status.as_u16(),
            message,
            data: details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique constraint violations surface as conflicts
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already exists!".to_string());
                    }
                    if constraint.contains("public_name") {
                        return ApiError::Conflict("User name already taken".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert request validation failures to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

/// Convert multipart parsing failures to API errors
impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart request: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<quillcast_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: quillcast_shared::auth::jwt::JwtError) -> Self {
        match err {
            quillcast_shared::auth::jwt::JwtError::Expired => {
                ApiError::Unauthorized("Token expired".to_string())
            }
            other => ApiError::Unauthorized(format!("Invalid token: {}", other)),
        }
    }
}

/// Convert password errors to API errors
impl From<quillcast_shared::auth::password::PasswordError> for ApiError {
    fn from(err: quillcast_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert object-storage failures to API errors
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::InternalError(format!("Object storage error: {}", err))
    }
}

/// Convert speech-synthesis failures to API errors
impl From<TtsError> for ApiError {
    fn from(err: TtsError) -> Self {
        ApiError::InternalError(format!("Speech synthesis error: {}", err))
    }
}

/// Convert payment-gateway failures to API errors
impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::InternalError(format!("Payment gateway error: {}", err))
    }
}

/// Convert document extraction failures to API errors
impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Fetch(msg) => {
                ApiError::BadRequest(format!("Failed to fetch document: {}", msg))
            }
            other => ApiError::InternalError(format!("Text extraction error: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApiError::BadRequest("Invalid user ID format".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid user ID format");

        let err = ApiError::NotFound("Manuscript not found!".to_string());
        assert_eq!(err.to_string(), "Not found: Manuscript not found!");
    }

    #[test]
    fn validation_errors_collect_details() {
        let errors = vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email address".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password too short".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn error_envelope_reports_failure() {
        let envelope = ErrorEnvelope {
            success: false,
            status_code: 404,
            message: "Manuscripts not found!".to_string(),
            data: None,
        };

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["statusCode"], 404);
        assert!(json.get("data").is_none());
    }
}
