//! HMAC-SHA256 verification of result deliveries.
//!
//! The sender signs the raw request body with the shared ingestion secret
//! and sends the hex digest in the `x-signature` header, optionally
//! prefixed with `sha256=`. Comparison is constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Hex HMAC-SHA256 of `body` under `secret`.
///
/// # Errors
///
/// Returns `AppError::Config` if the secret cannot key the MAC.
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String> {
    Ok(hex::encode(compute(secret, body)?))
}

/// Verify `header` against the HMAC of `body`.
///
/// # Errors
///
/// Returns `AppError::InvalidSignature` when the header is missing, not
/// hex, or does not match.
pub fn verify(secret: &[u8], body: &[u8], header: Option<&str>) -> Result<()> {
    let header = header
        .ok_or_else(|| AppError::InvalidSignature(format!("missing {SIGNATURE_HEADER} header")))?;
    let hex_digest = header.trim();
    let hex_digest = hex_digest.strip_prefix("sha256=").unwrap_or(hex_digest);
    let provided = hex::decode(hex_digest)
        .map_err(|err| AppError::InvalidSignature(format!("invalid hex: {err}")))?;

    let expected = compute(secret, body)?;
    if expected.ct_eq(&provided).into() {
        Ok(())
    } else {
        warn!("result signature verification failed");
        Err(AppError::InvalidSignature("signature mismatch".into()))
    }
}

fn compute(secret: &[u8], body: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|err| AppError::Config(format!("unusable ingestion secret: {err}")))?;
    mac.update(body);
    Ok(mac.finalize().into_bytes().to_vec())
}
