//! Manuscript endpoints: ingestion, search, analytics, and the
//! recent-search log.
//!
//! # Endpoints
//!
//! - `POST /manuscript/create` - Full ingestion pipeline, multipart (auth)
//! - `GET /manuscript?search=&category=&email=` - Search and listing
//! - `GET /manuscript/analytics` - Keyword analytics for an uploaded document
//! - `GET /manuscript/:id` - Single manuscript
//! - `DELETE /manuscript/search/:id` - Delete one recent-search entry
//! - `DELETE /manuscript/deleteSearch` - Clear the recent-search log
//!
//! Creation runs the whole pipeline inside the request: the document and
//! cover files upload concurrently, then text extraction, narration
//! synthesis, and the single row insert run in sequence. Any failure aborts
//! the request; there is no compensation for blobs already uploaded.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    pipeline::{
        analytics::{run_analytics, AnalyticsReport},
        extract::extract_text,
        intake::{read_multipart, store_optional, store_upload},
        narrate::narrate_to_storage,
    },
    response::ApiResponse,
};
use axum::{
    extract::{Multipart, Path, Query, State},
    Extension,
};
use futures::future;
use quillcast_shared::{
    auth::middleware::AuthContext,
    models::{
        manuscript::{CreateManuscript, Manuscript, ManuscriptCategory, ManuscriptFilter},
        recent_search::RecentSearch,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Manuscript metadata fields (multipart text parts)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateManuscriptRequest {
    #[validate(length(min = 3, max = 50, message = "Title must be 3 to 50 characters"))]
    pub title: String,

    #[validate(length(min = 10, max = 600, message = "Description must be 10 to 600 characters"))]
    pub description: String,

    pub category: ManuscriptCategory,
}

/// Search/listing query parameters
#[derive(Debug, Deserialize)]
pub struct ManuscriptQuery {
    pub search: Option<String>,
    pub category: Option<ManuscriptCategory>,
    pub email: Option<String>,
}

/// Creates a manuscript: uploads, extraction, narration, then one insert.
///
/// Multipart fields: `documentUrl` (PDF/DOCX file), `profileUrl` (cover
/// image), plus `title`/`description`/`category` metadata. Both file fields
/// are optional; a manuscript without a document simply has no audio URL.
///
/// # Errors
///
/// - `400 Bad Request`: malformed multipart body or disallowed file type
/// - `422 Unprocessable Entity`: metadata validation failed
/// - `500 Internal Server Error`: storage, extraction, or synthesis failure
pub async fn create_manuscript(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> ApiResult<ApiResponse<Manuscript>> {
    let mut intake = read_multipart(multipart).await?;
    let req: CreateManuscriptRequest = intake.parse_fields()?;
    req.validate()?;

    let document_file = intake.take_file("documentUrl");
    let profile_file = intake.take_file("profileUrl");

    // Uploads for distinct fields run concurrently.
    let (document_url, profile_url) = future::try_join(
        store_optional(state.storage.as_ref(), document_file.as_ref(), "documentUrl"),
        store_optional(state.storage.as_ref(), profile_file.as_ref(), "profileUrl"),
    )
    .await?;

    // Narration only happens when a document was supplied.
    let audio_url = match &document_url {
        Some(url) => {
            let text = extract_text(&state.http, url).await?;
            let audio_url = narrate_to_storage(
                state.tts.as_ref(),
                state.storage.as_ref(),
                &text,
                &state.config.tts.language,
            )
            .await?;
            Some(audio_url)
        }
        None => None,
    };

    let manuscript = Manuscript::create(
        &state.db,
        CreateManuscript {
            user_id: auth.user_id,
            title: req.title,
            description: req.description,
            category: req.category,
            document_url,
            profile_url,
            audio_url,
        },
    )
    .await?;

    Ok(ApiResponse::created(
        "Manuscript created successfully",
        manuscript,
    ))
}

/// Searches and lists manuscripts.
///
/// A non-empty `search` term is recorded in the recent-search log
/// (case-insensitive dedup) before the query runs. An empty result set is a
/// not-found condition, not an empty-list success.
pub async fn get_manuscripts(
    State(state): State<AppState>,
    Query(query): Query<ManuscriptQuery>,
) -> ApiResult<ApiResponse<Vec<Manuscript>>> {
    let search = query.search.filter(|s| !s.trim().is_empty());

    if let Some(term) = &search {
        RecentSearch::log(&state.db, term).await?;
    }

    let manuscripts = Manuscript::search(
        &state.db,
        ManuscriptFilter {
            search,
            category: query.category,
            email: query.email,
        },
    )
    .await?;

    if manuscripts.is_empty() {
        return Err(ApiError::NotFound("Manuscripts not found!".to_string()));
    }

    Ok(ApiResponse::created(
        "Manuscripts retrieved successfully",
        manuscripts,
    ))
}

/// Gets a single manuscript by id.
pub async fn get_manuscript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Manuscript>> {
    let id = parse_manuscript_id(&id)?;

    let manuscript = Manuscript::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Manuscript not found!".to_string()))?;

    Ok(ApiResponse::created(
        "Manuscript retrieved successfully",
        manuscript,
    ))
}

/// Runs keyword analytics for an uploaded document.
///
/// Multipart field `document` holds the file; it is stored first, then the
/// stored URL feeds the extraction + scoring pass.
///
/// # Errors
///
/// - `400 Bad Request`: no document supplied or disallowed file type
pub async fn get_analytics(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<ApiResponse<AnalyticsReport>> {
    let mut intake = read_multipart(multipart).await?;

    let document_file = intake
        .take_file("document")
        .ok_or_else(|| ApiError::BadRequest("Document file is required".to_string()))?;

    let document_url = store_upload(state.storage.as_ref(), &document_file, "document").await?;

    let text = extract_text(&state.http, &document_url).await?;
    let report = run_analytics(&text);

    Ok(ApiResponse::created(
        "Manuscript analytics computed successfully",
        report,
    ))
}

/// Deletes one recent-search entry.
pub async fn delete_search(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let id = parse_search_id(&id)?;

    if RecentSearch::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Search not found!".to_string()));
    }

    RecentSearch::delete(&state.db, id).await?;

    Ok(ApiResponse::created(
        "Deleted from search list successfully",
        (),
    ))
}

/// Clears the recent-search log.
///
/// # Errors
///
/// - `404 Not Found`: the log is already empty
pub async fn delete_all_searches(State(state): State<AppState>) -> ApiResult<ApiResponse<u64>> {
    if RecentSearch::count(&state.db).await? == 0 {
        return Err(ApiError::NotFound(
            "No search found to delete!".to_string(),
        ));
    }

    let deleted = RecentSearch::delete_all(&state.db).await?;

    Ok(ApiResponse::created("Search list cleared", deleted))
}

fn parse_manuscript_id(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id)
        .map_err(|_| ApiError::BadRequest("Invalid manuscript ID format".to_string()))
}

fn parse_search_id(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid search ID format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_validation_bounds() {
        let too_short = CreateManuscriptRequest {
            title: "ab".to_string(),
            description: "long enough description".to_string(),
            category: ManuscriptCategory::Fiction,
        };
        assert!(too_short.validate().is_err());

        let valid = CreateManuscriptRequest {
            title: "Tides".to_string(),
            description: "A novel about the sea and its moods.".to_string(),
            category: ManuscriptCategory::Fiction,
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn category_in_metadata_uses_wire_form() {
        let req: CreateManuscriptRequest = serde_json::from_value(serde_json::json!({
            "title": "Tides",
            "description": "A novel about the sea and its moods.",
            "category": "NON_FICTION"
        }))
        .unwrap();

        assert_eq!(req.category, ManuscriptCategory::NonFiction);
    }

    #[test]
    fn malformed_ids_are_bad_requests() {
        assert!(matches!(
            parse_manuscript_id("xyz"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(parse_search_id(""), Err(ApiError::BadRequest(_))));
    }
}
