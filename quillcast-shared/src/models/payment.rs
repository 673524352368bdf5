//! Payment model and database operations.
//!
//! A payment links a user, a manuscript, and a gateway payment intent. The
//! payment row and the manuscript's sold-counter increment are written in a
//! single transaction: either both land or neither does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::manuscript::ManuscriptCategory;

/// Payment row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique payment id (UUID v4)
    pub id: Uuid,

    /// Purchasing user
    pub user_id: Uuid,

    /// Purchased manuscript
    pub manuscript_id: Uuid,

    /// Amount in major currency units
    pub amount: i64,

    /// ISO currency code (e.g. "usd")
    pub currency: String,

    /// Gateway payment-intent id
    pub payment_intent_id: String,

    pub created_at: DateTime<Utc>,
}

/// Input for recording a payment
#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub user_id: Uuid,
    pub manuscript_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub payment_intent_id: String,
}

/// Denormalized manuscript summary attached to payment listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManuscriptSummary {
    pub title: String,
    pub category: ManuscriptCategory,
    pub profile_url: Option<String>,
    pub audio_url: Option<String>,
    pub document_url: Option<String>,
}

/// A payment together with its manuscript summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithManuscript {
    #[serde(flatten)]
    pub payment: Payment,
    pub manuscript: ManuscriptSummary,
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentManuscriptRow {
    id: Uuid,
    user_id: Uuid,
    manuscript_id: Uuid,
    amount: i64,
    currency: String,
    payment_intent_id: String,
    created_at: DateTime<Utc>,
    title: String,
    category: ManuscriptCategory,
    profile_url: Option<String>,
    audio_url: Option<String>,
    document_url: Option<String>,
}

impl From<PaymentManuscriptRow> for PaymentWithManuscript {
    fn from(row: PaymentManuscriptRow) -> Self {
        PaymentWithManuscript {
            payment: Payment {
                id: row.id,
                user_id: row.user_id,
                manuscript_id: row.manuscript_id,
                amount: row.amount,
                currency: row.currency,
                payment_intent_id: row.payment_intent_id,
                created_at: row.created_at,
            },
            manuscript: ManuscriptSummary {
                title: row.title,
                category: row.category,
                profile_url: row.profile_url,
                audio_url: row.audio_url,
                document_url: row.document_url,
            },
        }
    }
}

impl Payment {
    /// Records a payment and increments the manuscript's sold counter in one
    /// transaction.
    ///
    /// If either write fails, the transaction rolls back and neither the
    /// payment row nor the counter change is visible.
    pub async fn create_with_sold_increment(
        pool: &PgPool,
        data: CreatePayment,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (user_id, manuscript_id, amount, currency, payment_intent_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, manuscript_id, amount, currency, payment_intent_id, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.manuscript_id)
        .bind(data.amount)
        .bind(data.currency)
        .bind(data.payment_intent_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE manuscripts
            SET sold = sold + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(data.manuscript_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(payment)
    }

    /// Lists a user's payments, newest first, each with its manuscript
    /// summary.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<PaymentWithManuscript>, sqlx::Error> {
        let rows = sqlx::query_as::<_, PaymentManuscriptRow>(
            r#"
            SELECT p.id, p.user_id, p.manuscript_id, p.amount, p.currency,
                   p.payment_intent_id, p.created_at,
                   m.title, m.category, m.profile_url, m.audio_url, m.document_url
            FROM payments p
            JOIN manuscripts m ON m.id = p.manuscript_id
            WHERE p.user_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(PaymentWithManuscript::from).collect())
    }
}
