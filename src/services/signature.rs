//! Payment gateway signature scheme
//!
//! The gateway signs `order_id + "|" + payment_id` with HMAC-SHA256 using the
//! account's key secret and hands the hex digest to the client, which relays
//! it to us for verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `message` under `secret`
pub fn hmac_sha256_hex(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Expected signature for a gateway order/payment pair
pub fn expected_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    hmac_sha256_hex(secret, &format!("{}|{}", order_id, payment_id))
}

/// Constant-time comparison of the client-supplied signature against the
/// expected one. A wrong key simply yields `false`.
pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let expected = expected_signature(secret, order_id, payment_id);
    expected.as_bytes().ct_eq(signature.as_bytes()).unwrap_u8() == 1
}
