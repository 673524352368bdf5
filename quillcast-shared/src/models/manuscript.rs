//! Manuscript model and database operations.
//!
//! A manuscript is a submitted written work with its associated media URLs
//! (source document, cover image, audio narration) and a sold counter that
//! only the payment path mutates.
//!
//! # Schema
//!
//! ```sql
//! CREATE TYPE manuscript_category AS ENUM (
//!     'FICTION', 'NON_FICTION', 'TECHNOLOGY', 'POETRY', 'SCREENPLAY',
//!     'BUSINESS', 'NATURE', 'TRAVEL', 'ARTICLE'
//! );
//!
//! CREATE TABLE manuscripts (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     title VARCHAR(255) NOT NULL,
//!     description TEXT NOT NULL,
//!     category manuscript_category NOT NULL,
//!     document_url VARCHAR(512),
//!     profile_url VARCHAR(512),
//!     audio_url VARCHAR(512),
//!     sold BIGINT NOT NULL DEFAULT 0,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Closed set of manuscript genres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "manuscript_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManuscriptCategory {
    Fiction,
    NonFiction,
    Technology,
    Poetry,
    Screenplay,
    Business,
    Nature,
    Travel,
    Article,
}

/// Manuscript row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Manuscript {
    /// Unique manuscript id (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    pub title: String,
    pub description: String,
    pub category: ManuscriptCategory,

    /// Stored source document URL (absent when no document was uploaded)
    pub document_url: Option<String>,

    /// Cover image URL
    pub profile_url: Option<String>,

    /// Narration audio URL (absent when no document was uploaded)
    pub audio_url: Option<String>,

    /// Number of completed purchases
    pub sold: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a manuscript
#[derive(Debug, Clone)]
pub struct CreateManuscript {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ManuscriptCategory,
    pub document_url: Option<String>,
    pub profile_url: Option<String>,
    pub audio_url: Option<String>,
}

/// Search filters for manuscript listing; all filters are optional and
/// combine conjunctively.
#[derive(Debug, Clone, Default)]
pub struct ManuscriptFilter {
    /// Case-insensitive substring match on the title
    pub search: Option<String>,

    /// Exact category match
    pub category: Option<ManuscriptCategory>,

    /// Owner email match
    pub email: Option<String>,
}

impl Manuscript {
    /// Creates a manuscript row with the URLs produced by the ingestion
    /// pipeline.
    pub async fn create(pool: &PgPool, data: CreateManuscript) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Manuscript>(
            r#"
            INSERT INTO manuscripts
                (user_id, title, description, category, document_url, profile_url, audio_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, title, description, category, document_url, profile_url,
                      audio_url, sold, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.category)
        .bind(data.document_url)
        .bind(data.profile_url)
        .bind(data.audio_url)
        .fetch_one(pool)
        .await
    }

    /// Finds a manuscript by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Manuscript>(
            r#"
            SELECT id, user_id, title, description, category, document_url, profile_url,
                   audio_url, sold, created_at, updated_at
            FROM manuscripts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Searches manuscripts with the given filter, newest first.
    ///
    /// Absent filters match everything; the title filter is a
    /// case-insensitive substring match, and the email filter matches the
    /// owning user's email.
    pub async fn search(pool: &PgPool, filter: ManuscriptFilter) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Manuscript>(
            r#"
            SELECT m.id, m.user_id, m.title, m.description, m.category, m.document_url,
                   m.profile_url, m.audio_url, m.sold, m.created_at, m.updated_at
            FROM manuscripts m
            JOIN users u ON u.id = m.user_id
            WHERE ($1::text IS NULL OR m.title ILIKE '%' || $1 || '%')
              AND ($2::manuscript_category IS NULL OR m.category = $2)
              AND ($3::text IS NULL OR u.email = $3)
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(filter.search)
        .bind(filter.category)
        .bind(filter.email)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_value(ManuscriptCategory::NonFiction).unwrap(),
            serde_json::json!("NON_FICTION")
        );
        assert_eq!(
            serde_json::to_value(ManuscriptCategory::Fiction).unwrap(),
            serde_json::json!("FICTION")
        );
    }

    #[test]
    fn category_parses_from_wire_form() {
        let category: ManuscriptCategory = serde_json::from_str("\"SCREENPLAY\"").unwrap();
        assert_eq!(category, ManuscriptCategory::Screenplay);

        assert!(serde_json::from_str::<ManuscriptCategory>("\"WESTERN\"").is_err());
    }

    #[test]
    fn manuscript_wire_format_is_camel_case() {
        let manuscript = Manuscript {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Tides".to_string(),
            description: "A novel about the sea.".to_string(),
            category: ManuscriptCategory::Fiction,
            document_url: Some("https://cdn.example.com/doc.pdf".to_string()),
            profile_url: None,
            audio_url: None,
            sold: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&manuscript).unwrap();
        assert!(json.get("documentUrl").is_some());
        assert!(json.get("userId").is_some());
        assert!(json.get("document_url").is_none());
    }
}
