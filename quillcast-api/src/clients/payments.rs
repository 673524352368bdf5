//! Payment gateway client.
//!
//! The gateway contract is a single operation: create a payment intent for
//! an amount in minor currency units and get back the intent id plus the
//! client secret the frontend needs to confirm the payment. The production
//! implementation is Stripe's `POST /v1/payment_intents`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Error type for payment gateway operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request failed to complete
    #[error("Gateway request failed: {0}")]
    Request(String),

    /// Gateway answered with a non-success status
    #[error("Gateway rejected the request with status {0}: {1}")]
    Rejected(u16, String),

    /// Gateway response could not be decoded
    #[error("Unexpected gateway response: {0}")]
    Decode(String),
}

/// A created payment intent.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Gateway intent id (e.g. "pi_...")
    pub id: String,

    /// Client secret the frontend uses to confirm the payment
    pub client_secret: String,
}

/// Payment gateway: `create_intent(amount_minor_units, currency)`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a card payment intent for `amount` minor currency units.
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, GatewayError>;
}

/// Stripe payment gateway client.
pub struct StripeGateway {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl StripeGateway {
    pub fn new(client: Client, secret_key: &str) -> Self {
        Self::with_base_url(client, secret_key, "https://api.stripe.com")
    }

    /// Overrides the API base URL (used to point tests at a stub server).
    pub fn with_base_url(client: Client, secret_key: &str, base_url: &str) -> Self {
        Self {
            client,
            secret_key: secret_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        debug!(amount, currency, "Creating payment intent");

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount.to_string()),
                ("currency", currency.to_string()),
                ("payment_method_types[]", "card".to_string()),
            ])
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected(status.as_u16(), body));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

/// Mock gateway for tests: hands out sequential deterministic intents.
#[derive(Default)]
pub struct MockGateway {
    counter: AtomicU64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentIntent {
            id: format!("pi_mock_{n}_{amount}_{currency}"),
            client_secret: format!("pi_mock_{n}_secret"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_gateway_hands_out_distinct_intents() {
        let gateway = MockGateway::new();

        let first = gateway.create_intent(2500, "usd").await.unwrap();
        let second = gateway.create_intent(2500, "usd").await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(first.id.starts_with("pi_mock_"));
        assert!(first.client_secret.ends_with("_secret"));
    }

    #[test]
    fn payment_intent_decodes_from_gateway_json() {
        let intent: PaymentIntent = serde_json::from_str(
            r#"{"id": "pi_123", "client_secret": "pi_123_secret_abc", "object": "payment_intent"}"#,
        )
        .unwrap();

        assert_eq!(intent.id, "pi_123");
        assert_eq!(intent.client_secret, "pi_123_secret_abc");
    }
}
