//! Notification model: read-only listing of per-user notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Notification row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification id (UUID v4)
    pub id: Uuid,

    /// Receiving user
    pub user_id: Uuid,

    /// Notification text
    pub message: String,

    /// Whether the user has seen it
    pub read: bool,

    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Lists notifications for the user with the given email, newest first.
    pub async fn list_by_user_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT n.id, n.user_id, n.message, n.read, n.created_at
            FROM notifications n
            JOIN users u ON u.id = n.user_id
            WHERE u.email = $1
            ORDER BY n.created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(pool)
        .await
    }
}
