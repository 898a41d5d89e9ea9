//! Access token expiry checks. The payload is decoded without verifying the
//! signature: the client only needs to know when to refresh, the API remains
//! the authority on whether a token is valid.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: f64,
}

/// Expiry of `token` in milliseconds since the epoch, if it can be decoded.
#[must_use]
pub fn expiry_ms(token: &str) -> Option<f64> {
    let mut parts = token.trim().split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;

    let bytes = Base64UrlUnpadded::decode_vec(payload.trim_end_matches('=')).ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;

    claim.exp.is_finite().then_some(claim.exp * 1000.0)
}

/// Like [`is_expired`] against an explicit clock.
#[must_use]
pub fn is_expired_at(token: &str, now_ms: f64) -> bool {
    expiry_ms(token).map_or(true, |exp_ms| exp_ms < now_ms)
}

/// True if the token's `exp` is in the past or the token cannot be decoded.
#[must_use]
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_ms())
}

#[allow(clippy::cast_precision_loss)]
fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_millis() as f64)
}

/// Builds an unsigned JWT-shaped token carrying `claims`, for tests.
#[cfg(test)]
pub(crate) fn encode_unsigned(claims: &serde_json::Value) -> String {
    let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
    format!("{header}.{payload}.signature")
}
