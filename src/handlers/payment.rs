use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{error, warn};

use crate::AppState;
use crate::models::error::{ApiError, api_error, bad_request, json_body, missing_fields};
use crate::models::payment::{
    CreateOrderRequest, CreateOrderResponse, VerifiedPayment, VerifyPaymentRequest,
    VerifyPaymentResponse,
};
use crate::services::payment::{self, DEFAULT_CURRENCY, NewOrder, PaymentError};
use crate::services::payment_gateway::GatewayError;

/// Map payment service errors to HTTP responses
fn map_payment_error(e: PaymentError) -> ApiError {
    match e {
        PaymentError::Invalid(msg) => bad_request(msg),
        PaymentError::NotFound(_) => api_error(StatusCode::NOT_FOUND, e.to_string(), "PAYMENT_NOT_FOUND"),
        PaymentError::SignatureMismatch => {
            api_error(StatusCode::BAD_REQUEST, e.to_string(), "INVALID_SIGNATURE")
        }
        PaymentError::AlreadyFailed(_) => {
            api_error(StatusCode::CONFLICT, e.to_string(), "PAYMENT_ALREADY_FAILED")
        }
        PaymentError::AlreadyVerified(_) => {
            api_error(StatusCode::CONFLICT, e.to_string(), "PAYMENT_ALREADY_VERIFIED")
        }
        PaymentError::Gateway(GatewayError::Timeout(_)) => {
            warn!(error = %e, "Payment gateway timed out");
            api_error(StatusCode::GATEWAY_TIMEOUT, e.to_string(), "GATEWAY_TIMEOUT")
        }
        PaymentError::Gateway(ref inner) => {
            error!(error = %inner, "Payment gateway failure");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), "GATEWAY_ERROR")
        }
        PaymentError::Database(ref inner) => {
            error!(error = %inner, "Payment persistence failure");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), "DATABASE_ERROR")
        }
    }
}

/// POST /api/payment/order
///
/// Creates a gateway order for `amount` (major units) and records a Pending
/// payment for `userId`. Responds with the gateway order descriptor.
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let request = json_body(payload)?;

    if let Some(msg) = missing_fields(&[
        ("amount", request.amount.is_some()),
        ("userId", request.user_id.is_some()),
    ]) {
        return Err(bad_request(msg));
    }

    let currency = request
        .currency
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let order = payment::create_order(
        &state.db,
        state.gateway.as_ref(),
        state.config.gateway_timeout,
        NewOrder {
            amount: request.amount.unwrap_or_default(),
            currency,
            user_id: request.user_id.unwrap_or_default(),
        },
    )
    .await
    .map_err(map_payment_error)?;

    Ok(Json(CreateOrderResponse {
        message: "Order Created".to_string(),
        order,
    }))
}

/// POST /api/payment/verify
///
/// Checks the gateway signature over `order_id|payment_id`. A match marks
/// the payment Success, a mismatch marks it Failed and responds 400.
pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let request = json_body(payload)?;

    if let Some(msg) = missing_fields(&[
        ("order_id", request.order_id.is_some()),
        ("payment_id", request.payment_id.is_some()),
        ("signature", request.signature.is_some()),
    ]) {
        return Err(bad_request(msg));
    }
    let order_id = request.order_id.unwrap_or_default();
    let payment_id = request.payment_id.unwrap_or_default();
    let signature = request.signature.unwrap_or_default();

    let settled = payment::verify_payment(
        &state.db,
        &state.config.razorpay.key_secret,
        &order_id,
        &payment_id,
        &signature,
    )
    .await
    .map_err(map_payment_error)?;

    Ok(Json(VerifyPaymentResponse {
        success: true,
        message: "Payment Verified".to_string(),
        payment: VerifiedPayment {
            id: payment_id,
            order_id: settled.order_id,
            amount: settled.amount,
        },
    }))
}
