//! Review endpoints.
//!
//! # Endpoints
//!
//! - `POST /review` - Create a review for an existing manuscript
//! - `GET /review` - All reviews
//! - `GET /review/:id` - Reviews for one manuscript

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
};
use axum::{
    extract::{Path, State},
    Json,
};
use quillcast_shared::models::{
    manuscript::Manuscript,
    review::{CreateReview, Review},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create review request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    /// Reviewed manuscript
    pub manuscript_id: Uuid,

    /// Rating, 1 to 5
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    /// Optional comment
    #[validate(length(max = 600, message = "Comment is too long"))]
    pub comment: Option<String>,
}

/// Creates a review after verifying the manuscript exists.
///
/// # Errors
///
/// - `404 Not Found`: no such manuscript
/// - `422 Unprocessable Entity`: validation failed
pub async fn create_review(
    State(state): State<AppState>,
    Json(req): Json<CreateReviewRequest>,
) -> ApiResult<ApiResponse<Review>> {
    req.validate()?;

    if Manuscript::find_by_id(&state.db, req.manuscript_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Manuscript not found!".to_string()));
    }

    let review = Review::create(
        &state.db,
        CreateReview {
            manuscript_id: req.manuscript_id,
            rating: req.rating,
            comment: req.comment,
        },
    )
    .await?;

    Ok(ApiResponse::created("Review provided successfully", review))
}

/// Lists every review.
pub async fn get_reviews(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<Review>>> {
    list_reviews(&state, None).await
}

/// Lists reviews for one manuscript.
pub async fn get_reviews_for_manuscript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Vec<Review>>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid manuscript ID format".to_string()))?;

    list_reviews(&state, Some(id)).await
}

async fn list_reviews(
    state: &AppState,
    manuscript_id: Option<Uuid>,
) -> ApiResult<ApiResponse<Vec<Review>>> {
    let reviews = Review::list(&state.db, manuscript_id).await?;

    if reviews.is_empty() {
        return Err(ApiError::NotFound("Reviews not found!".to_string()));
    }

    Ok(ApiResponse::ok("Reviews retrieved successfully", reviews))
}
