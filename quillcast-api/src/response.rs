//! The uniform response envelope.
//!
//! Every handler responds with the same JSON shape:
//!
//! ```json
//! {
//!   "success": true,
//!   "statusCode": 201,
//!   "message": "Manuscript created successfully",
//!   "data": { ... }
//! }
//! ```
//!
//! Errors go through the same envelope with `success: false` (see
//! [`crate::error::ApiError`]).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope carrying a payload of type `T`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(rename = "statusCode")]
    pub status_code: u16,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Builds a success envelope with the given status code and payload.
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// Builds a `201 Created` envelope. The original API reports 201 for
    /// most operations, including reads and deletes; that observed behavior
    /// is preserved.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, data)
    }

    /// Builds a `200 OK` envelope.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, data)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_serializes_with_camel_case_status() {
        let envelope = ApiResponse::created("Manuscript created successfully", json!({"id": 1}));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["message"], "Manuscript created successfully");
        assert_eq!(value["data"]["id"], 1);
    }

    #[test]
    fn ok_envelope_uses_200() {
        let envelope = ApiResponse::ok("Payments retrieved successfully", json!([]));
        assert_eq!(envelope.status_code, 200);
        assert!(envelope.success);
    }
}
