//! Payment endpoints.
//!
//! # Endpoints
//!
//! - `POST /payment/create-payment-intent` - Create an intent and record the purchase (auth)
//! - `GET /payment/payments` - The caller's payment history (auth)
//!
//! Intent creation happens first against the gateway; the payment row and
//! the manuscript's sold-counter increment then land in one database
//! transaction, so a failure on either write leaves both unchanged.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
};
use axum::{extract::State, Extension, Json};
use quillcast_shared::{
    auth::middleware::AuthContext,
    models::{
        manuscript::Manuscript,
        payment::{CreatePayment, Payment, PaymentWithManuscript},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create payment intent request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Amount in major currency units
    #[validate(range(min = 1, message = "Amount must be at least 1"))]
    pub amount: i64,

    /// Manuscript being purchased
    pub manuscript_id: Uuid,
}

/// Create payment intent response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    /// Client secret the frontend uses to confirm the payment
    pub client_secret: String,

    /// The recorded payment
    pub payment_record: Payment,
}

/// Creates a payment intent and records the purchase.
///
/// The gateway receives the amount in minor units (`amount * 100`); the
/// payment row stores major units as submitted.
///
/// # Errors
///
/// - `404 Not Found`: no such manuscript
/// - `422 Unprocessable Entity`: validation failed
/// - `500 Internal Server Error`: gateway failure
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreatePaymentIntentRequest>,
) -> ApiResult<ApiResponse<CreatePaymentIntentResponse>> {
    req.validate()?;

    if Manuscript::find_by_id(&state.db, req.manuscript_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Manuscript not found!".to_string()));
    }

    let currency = state.config.payment.currency.clone();
    let intent = state
        .payments
        .create_intent(req.amount * 100, &currency)
        .await?;

    let payment = Payment::create_with_sold_increment(
        &state.db,
        CreatePayment {
            user_id: auth.user_id,
            manuscript_id: req.manuscript_id,
            amount: req.amount,
            currency,
            payment_intent_id: intent.id,
        },
    )
    .await?;

    Ok(ApiResponse::ok(
        "Payment successful",
        CreatePaymentIntentResponse {
            client_secret: intent.client_secret,
            payment_record: payment,
        },
    ))
}

/// Lists the caller's payments with their manuscript summaries.
///
/// # Errors
///
/// - `404 Not Found`: the caller has no payments
pub async fn get_payments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<Vec<PaymentWithManuscript>>> {
    let payments = Payment::list_for_user(&state.db, auth.user_id).await?;

    if payments.is_empty() {
        return Err(ApiError::NotFound("No payments found".to_string()));
    }

    Ok(ApiResponse::ok(
        "Payments retrieved successfully",
        payments,
    ))
}
