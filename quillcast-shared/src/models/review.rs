//! Review model and database operations.
//!
//! Reviews reference a manuscript that must already exist; the route layer
//! verifies existence before inserting, and the foreign key backs that up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Review row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique review id (UUID v4)
    pub id: Uuid,

    /// Reviewed manuscript
    pub manuscript_id: Uuid,

    /// Rating, 1 to 5
    pub rating: i32,

    /// Optional free-text comment
    pub comment: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a review
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub manuscript_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

impl Review {
    /// Creates a review.
    pub async fn create(pool: &PgPool, data: CreateReview) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (manuscript_id, rating, comment)
            VALUES ($1, $2, $3)
            RETURNING id, manuscript_id, rating, comment, created_at
            "#,
        )
        .bind(data.manuscript_id)
        .bind(data.rating)
        .bind(data.comment)
        .fetch_one(pool)
        .await
    }

    /// Lists reviews, optionally restricted to one manuscript, newest first.
    pub async fn list(
        pool: &PgPool,
        manuscript_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT id, manuscript_id, rating, comment, created_at
            FROM reviews
            WHERE ($1::uuid IS NULL OR manuscript_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(manuscript_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_wire_format_is_camel_case() {
        let review = Review {
            id: Uuid::new_v4(),
            manuscript_id: Uuid::new_v4(),
            rating: 4,
            comment: Some("Gripping.".to_string()),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&review).unwrap();
        assert!(json.get("manuscriptId").is_some());
        assert_eq!(json["rating"], 4);
    }
}
