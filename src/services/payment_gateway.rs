//! Payment gateway client
//!
//! Orders are created with the gateway before the client collects payment.
//! The trait lets tests swap in a deterministic gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RazorpayConfig;

/// Order descriptor returned by the gateway and forwarded to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in minor currency units (paise for INR)
    pub amount: i64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway did not respond within {0:?}")]
    Timeout(Duration),
    #[error("payment gateway rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("payment gateway request failed: {0}")]
    Transport(String),
    #[error("unexpected payment gateway response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError>;
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: u8,
}

#[derive(Clone)]
pub struct RazorpayGateway {
    client: Client,
    key_id: String,
    key_secret: String,
    base_url: String,
    timeout: Duration,
}

impl RazorpayGateway {
    pub fn new(config: &RazorpayConfig, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout)
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/orders", self.base_url);

        tracing::debug!(amount_minor, currency, receipt, "Creating gateway order");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderBody {
                amount: amount_minor,
                currency,
                receipt,
                payment_capture: 1,
            })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| self.map_transport_error(e))?;
            return Err(GatewayError::Rejected { status, body });
        }

        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
