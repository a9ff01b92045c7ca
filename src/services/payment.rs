//! Order initiation and payment verification
//!
//! A Payment row is created Pending when the gateway order is created and
//! moves to Success or Failed exactly once. Transitions are conditional
//! updates filtered on `status = Pending`, so concurrent verifications of the
//! same order cannot both win and a terminal status is never rewritten.

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::entities::payments::{self, PaymentStatus};
use crate::entities::prelude::Payments;
use crate::services::payment_gateway::{GatewayError, GatewayOrder, PaymentGateway};
use crate::services::signature::verify_signature;

pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("{0}")]
    Invalid(String),
    #[error("Payment not found for order {0}")]
    NotFound(String),
    #[error("Invalid Payment Signature")]
    SignatureMismatch,
    #[error("Payment for order {0} has already failed verification")]
    AlreadyFailed(String),
    #[error("Payment for order {0} was already verified with a different payment id")]
    AlreadyVerified(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub amount: Decimal,
    pub currency: String,
    pub user_id: i32,
}

/// Major units to gateway minor units (`amount * 100`, rounded to the
/// nearest unit). `None` when the result does not fit an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount.checked_mul(Decimal::ONE_HUNDRED)?.round().to_i64()
}

/// Creates a gateway order and records it as a Pending payment.
///
/// The gateway call is bounded by `timeout`; a timed-out or failed call
/// leaves no Payment row behind.
pub async fn create_order(
    db: &DatabaseConnection,
    gateway: &dyn PaymentGateway,
    timeout: Duration,
    order: NewOrder,
) -> Result<GatewayOrder, PaymentError> {
    if order.amount <= Decimal::ZERO {
        return Err(PaymentError::Invalid(
            "Amount must be greater than 0".to_string(),
        ));
    }

    let amount_minor = to_minor_units(order.amount)
        .ok_or_else(|| PaymentError::Invalid("Amount is too large".to_string()))?;

    let receipt = format!("order_rcpt_{}", Utc::now().timestamp_millis());

    let gateway_order = tokio::time::timeout(
        timeout,
        gateway.create_order(amount_minor, &order.currency, &receipt),
    )
    .await
    .map_err(|_| GatewayError::Timeout(timeout))??;

    payments::ActiveModel {
        order_id: Set(gateway_order.id.clone()),
        payment_id: Set(None),
        signature: Set(None),
        amount: Set(order.amount),
        currency: Set(gateway_order.currency.clone()),
        status: Set(PaymentStatus::Pending),
        user_id: Set(order.user_id),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        order_id = %gateway_order.id,
        user_id = order.user_id,
        amount = %order.amount,
        "Payment order created"
    );

    Ok(gateway_order)
}

/// Checks the gateway signature for `(order_id, payment_id)` and settles the
/// matching Payment.
///
/// Returns the settled payment on success. A mismatch marks a Pending
/// payment Failed and returns [`PaymentError::SignatureMismatch`].
pub async fn verify_payment(
    db: &DatabaseConnection,
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<payments::Model, PaymentError> {
    let payment = Payments::find()
        .filter(payments::Column::OrderId.eq(order_id))
        .one(db)
        .await?
        .ok_or_else(|| PaymentError::NotFound(order_id.to_string()))?;

    if !verify_signature(key_secret, order_id, payment_id, signature) {
        let result = Payments::update_many()
            .set(payments::ActiveModel {
                status: Set(PaymentStatus::Failed),
                ..Default::default()
            })
            .filter(payments::Column::Id.eq(payment.id))
            .filter(payments::Column::Status.eq(PaymentStatus::Pending))
            .exec(db)
            .await?;

        warn!(
            order_id,
            marked_failed = result.rows_affected == 1,
            "Payment signature mismatch"
        );
        return Err(PaymentError::SignatureMismatch);
    }

    let result = Payments::update_many()
        .set(payments::ActiveModel {
            payment_id: Set(Some(payment_id.to_string())),
            signature: Set(Some(signature.to_string())),
            status: Set(PaymentStatus::Success),
            ..Default::default()
        })
        .filter(payments::Column::Id.eq(payment.id))
        .filter(payments::Column::Status.eq(PaymentStatus::Pending))
        .exec(db)
        .await?;

    let current = Payments::find_by_id(payment.id)
        .one(db)
        .await?
        .ok_or_else(|| PaymentError::NotFound(order_id.to_string()))?;

    if result.rows_affected == 1 {
        info!(order_id, payment_id, "Payment verified");
        return Ok(current);
    }

    // Already terminal: only a replay of the same successful payment is accepted
    match current.status {
        PaymentStatus::Success if current.payment_id.as_deref() == Some(payment_id) => {
            info!(order_id, payment_id, "Payment already verified");
            Ok(current)
        }
        PaymentStatus::Success => Err(PaymentError::AlreadyVerified(order_id.to_string())),
        PaymentStatus::Failed => Err(PaymentError::AlreadyFailed(order_id.to_string())),
        PaymentStatus::Pending => Err(PaymentError::Database(DbErr::RecordNotUpdated)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(dec!(5000)), Some(500000));
        assert_eq!(to_minor_units(dec!(499.99)), Some(49999));
        assert_eq!(to_minor_units(dec!(0.015)), Some(2));
    }

    #[test]
    fn test_to_minor_units_overflow() {
        assert_eq!(to_minor_units(Decimal::MAX), None);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PaymentError::SignatureMismatch.to_string(),
            "Invalid Payment Signature"
        );
        assert_eq!(
            PaymentError::NotFound("order_9".to_string()).to_string(),
            "Payment not found for order order_9"
        );
    }
}
