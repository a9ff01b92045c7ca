//! Request/response models for the payment endpoints

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::payment_gateway::GatewayOrder;

/// POST /api/payment/order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Amount in major currency units
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Defaults to INR
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub message: String,
    pub order: GatewayOrder,
}

/// POST /api/payment/verify, field names as sent by the gateway checkout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPayment {
    /// Gateway payment id
    pub id: String,
    pub order_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub payment: VerifiedPayment,
}
