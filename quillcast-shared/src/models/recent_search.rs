//! Recent-search log model and database operations.
//!
//! A successful manuscript search records its term here at most once,
//! case-insensitively: repeated searches for "Poetry", "poetry", or
//! "POETRY" leave a single row. The unique index on `LOWER(search_term)`
//! enforces the invariant even under concurrent searches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Recent-search row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentSearch {
    /// Unique entry id (UUID v4)
    pub id: Uuid,

    /// The search term as first entered
    pub search_term: String,

    pub created_at: DateTime<Utc>,
}

impl RecentSearch {
    /// Logs a search term, deduplicating case-insensitively.
    ///
    /// A term that is already present (in any casing) is silently skipped.
    pub async fn log(pool: &PgPool, search_term: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO recent_searches (search_term)
            VALUES ($1)
            ON CONFLICT (LOWER(search_term)) DO NOTHING
            "#,
        )
        .bind(search_term)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Finds one entry by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, RecentSearch>(
            r#"
            SELECT id, search_term, created_at
            FROM recent_searches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes one entry by id; returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recent_searches WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every entry; returns how many rows were removed.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recent_searches")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Counts logged search terms.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recent_searches")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
