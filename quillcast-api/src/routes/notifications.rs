//! Notification endpoints.
//!
//! # Endpoints
//!
//! - `GET /notification?email=` - Notifications for the user with that email

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
};
use axum::extract::{Query, State};
use quillcast_shared::models::notification::Notification;
use serde::Deserialize;

/// Notification query parameters
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub email: Option<String>,
}

/// Lists a user's notifications by email.
///
/// # Errors
///
/// - `400 Bad Request`: missing email parameter
/// - `404 Not Found`: the user has no notifications
pub async fn get_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<ApiResponse<Vec<Notification>>> {
    let email = query
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Email query parameter is required".to_string()))?;

    let notifications = Notification::list_by_user_email(&state.db, &email).await?;

    if notifications.is_empty() {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(ApiResponse::created(
        "Notifications retrieved successfully",
        notifications,
    ))
}
