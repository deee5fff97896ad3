//! Signer and verifier
//!
//! [`sign`] and [`verify`] dispatch on the `(algorithm, key)` pair. Any pair
//! the registry does not allow fails with [`JwtError::InvalidKey`] before a
//! primitive runs; there is no fallback from one family to another.

mod ecdsa;
mod hmac;
mod rsa;

use crate::algorithms::Algorithm;
use crate::error::{JwtError, JwtResult};
use crate::keys::{SigningKey, VerifyingKey};

/// Compute the raw signature over `signing_input`
///
/// HMAC algorithms produce the keyed hash, RS* produce an RSASSA-PKCS1-v1_5
/// signature, ES* produce the fixed-width `r || s` pair.
///
/// # Errors
/// Returns [`JwtError::InvalidKey`] when `key` does not fit `algorithm`
/// (wrong family, wrong curve, HMAC secret too short, RSA modulus too small).
pub fn sign(signing_input: &[u8], key: &SigningKey, algorithm: Algorithm) -> JwtResult<Vec<u8>> {
    match (algorithm, key) {
        (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512, SigningKey::Hmac(secret)) => {
            secret.check_strength(algorithm)?;
            hmac::sign(algorithm.digest(), secret.as_bytes(), signing_input)
        }
        (Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512, SigningKey::Rsa(private_key)) => {
            rsa::sign(algorithm.digest(), private_key, signing_input)
        }
        (Algorithm::ES256, SigningKey::EcP256(private_key)) => {
            ecdsa::sign_p256(private_key, signing_input)
        }
        (Algorithm::ES384, SigningKey::EcP384(private_key)) => {
            ecdsa::sign_p384(private_key, signing_input)
        }
        _ => Err(key_mismatch(algorithm, key.description())),
    }
}

/// Check `signature` over `signing_input`
///
/// Returns `Ok(false)` for a well-formed key whose signature does not match,
/// including signatures of the wrong length. HMAC tags are compared in
/// constant time.
///
/// # Errors
/// Returns [`JwtError::InvalidKey`] when `key` does not fit `algorithm`.
pub fn verify(
    signing_input: &[u8],
    key: &VerifyingKey,
    algorithm: Algorithm,
    signature: &[u8],
) -> JwtResult<bool> {
    match (algorithm, key) {
        (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512, VerifyingKey::Hmac(secret)) => {
            secret.check_strength(algorithm)?;
            hmac::verify(algorithm.digest(), secret.as_bytes(), signing_input, signature)
        }
        (Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512, VerifyingKey::Rsa(public_key)) => {
            rsa::verify(algorithm.digest(), public_key, signing_input, signature)
        }
        (Algorithm::ES256, VerifyingKey::EcP256(public_key)) => {
            Ok(ecdsa::verify_p256(public_key, signing_input, signature))
        }
        (Algorithm::ES384, VerifyingKey::EcP384(public_key)) => {
            Ok(ecdsa::verify_p384(public_key, signing_input, signature))
        }
        _ => Err(key_mismatch(algorithm, key.description())),
    }
}

fn key_mismatch(algorithm: Algorithm, key: &str) -> JwtError {
    JwtError::invalid_key(format!("{algorithm} cannot be used with {key}"))
}
