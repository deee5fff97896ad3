//! ECDSA for ES256 (P-256) and ES384 (P-384)
//!
//! JWS carries ECDSA signatures as the fixed-width concatenation `r || s`
//! (RFC 7518 §3.4), not ASN.1 DER.

use crate::error::{JwtError, JwtResult};
use p256::ecdsa::signature::{Signer, Verifier};

pub(crate) fn sign_p256(key: &p256::ecdsa::SigningKey, message: &[u8]) -> JwtResult<Vec<u8>> {
    let signature: p256::ecdsa::Signature = key
        .try_sign(message)
        .map_err(|e| JwtError::invalid_key(format!("ES256 signing failed: {e}")))?;
    Ok(signature.to_bytes().to_vec())
}

pub(crate) fn verify_p256(
    key: &p256::ecdsa::VerifyingKey,
    message: &[u8],
    signature: &[u8],
) -> bool {
    p256::ecdsa::Signature::from_slice(signature)
        .is_ok_and(|signature| key.verify(message, &signature).is_ok())
}

pub(crate) fn sign_p384(key: &p384::ecdsa::SigningKey, message: &[u8]) -> JwtResult<Vec<u8>> {
    let signature: p384::ecdsa::Signature = key
        .try_sign(message)
        .map_err(|e| JwtError::invalid_key(format!("ES384 signing failed: {e}")))?;
    Ok(signature.to_bytes().to_vec())
}

pub(crate) fn verify_p384(
    key: &p384::ecdsa::VerifyingKey,
    message: &[u8],
    signature: &[u8],
) -> bool {
    p384::ecdsa::Signature::from_slice(signature)
        .is_ok_and(|signature| key.verify(message, &signature).is_ok())
}
