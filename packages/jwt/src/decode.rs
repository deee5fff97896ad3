//! Token decoding and verification
//!
//! Stages run in a fixed order and the first failure wins:
//!
//! 1. empty token
//! 2. segment count
//! 3. base64url of all three segments
//! 4. header and claims JSON shape
//! 5. `alg` registered and accepted by the caller
//! 6. signature over the segments exactly as received
//! 7. `nbf`, then `exp`, then any optional policy checks
//!
//! Nothing from the claims is trusted before stage 6 succeeds.

use crate::algorithms::{Algorithm, AlgorithmSet};
use crate::base64url;
use crate::crypto;
use crate::encode::json_type;
use crate::error::{JwtError, JwtResult, Segment};
use crate::keys::VerifyingKey;
use crate::types::{Claims, UntrustedHeader};
use crate::validation::Validation;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Verify `token` and return its claims
///
/// Signature, `nbf` and `exp` are checked; `alg` must be in `acceptable`.
/// Equivalent to [`decode_with`] under [`Validation::new`].
///
/// # Errors
/// The first failing stage's [`JwtError`], see the module docs.
pub fn decode(token: &str, key: &VerifyingKey, acceptable: &AlgorithmSet) -> JwtResult<Claims> {
    decode_with(token, key, &Validation::new(*acceptable))
}

/// Verify `token` under an explicit policy
///
/// # Errors
/// The first failing stage's [`JwtError`], see the module docs.
pub fn decode_with(token: &str, key: &VerifyingKey, validation: &Validation) -> JwtResult<Claims> {
    verify_token(token, key, validation).inspect_err(|e| {
        tracing::debug!(kind = ?e.kind(), "token rejected");
    })
}

/// Verify `token` and deserialize its claims into `T`
///
/// # Errors
/// As [`decode_with`], plus [`JwtError::MalformedPayload`] when the verified
/// claims do not fit `T`.
pub fn decode_claims<T>(token: &str, key: &VerifyingKey, validation: &Validation) -> JwtResult<T>
where
    T: DeserializeOwned,
{
    let claims = decode_with(token, key, validation)?;
    serde_json::from_value(Value::Object(claims))
        .map_err(|e| JwtError::malformed_payload(format!("claims do not match target type: {e}")))
}

/// Read the header of `token` without verifying anything
///
/// Meant for choosing a key (for example by `kid`) before calling
/// [`decode_with`]. The result is attacker-controlled.
///
/// # Errors
/// [`JwtError::MissingToken`], [`JwtError::MalformedToken`],
/// [`JwtError::MalformedEncoding`] or [`JwtError::MalformedPayload`] for
/// the header segment.
pub fn decode_header(token: &str) -> JwtResult<UntrustedHeader> {
    let [header, _, _] = split(token)?;
    let bytes = base64url::decode(header).map_err(|e| e.in_segment(Segment::Header))?;
    parse_header(&bytes)
}

fn verify_token(token: &str, key: &VerifyingKey, validation: &Validation) -> JwtResult<Claims> {
    let [header_b64, claims_b64, signature_b64] = split(token)?;

    let header_bytes = base64url::decode(header_b64).map_err(|e| e.in_segment(Segment::Header))?;
    let claims_bytes = base64url::decode(claims_b64).map_err(|e| e.in_segment(Segment::Claims))?;
    let signature =
        base64url::decode(signature_b64).map_err(|e| e.in_segment(Segment::Signature))?;
    tracing::trace!("segments decoded");

    let header = parse_header(&header_bytes)?;
    let claims = parse_claims(&claims_bytes)?;

    let algorithm = accepted_algorithm(&header.alg, &validation.algorithms)?;
    tracing::trace!(%algorithm, key = key.description(), "verifying signature");

    let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
    if !crypto::verify(signing_input.as_bytes(), key, algorithm, &signature)? {
        return Err(JwtError::SignatureInvalid);
    }

    validation.check_claims(&claims)?;
    tracing::trace!(%algorithm, "token accepted");
    Ok(claims)
}

fn split(token: &str) -> JwtResult<[&str; 3]> {
    if token.is_empty() {
        return Err(JwtError::MissingToken);
    }

    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(claims), Some(signature), None) => Ok([header, claims, signature]),
        _ => Err(JwtError::MalformedToken(token.split('.').count())),
    }
}

fn parse_header(bytes: &[u8]) -> JwtResult<UntrustedHeader> {
    let header = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Err(JwtError::malformed_payload(format!(
                "header must be a JSON object, got {}",
                json_type(&other)
            )));
        }
        Err(e) => {
            return Err(JwtError::malformed_payload(format!(
                "header is not valid JSON: {e}"
            )));
        }
    };

    let alg = match header.get("alg") {
        Some(Value::String(alg)) => alg.clone(),
        Some(_) => return Err(JwtError::malformed_payload("header alg must be a string")),
        None => return Err(JwtError::malformed_payload("header has no alg")),
    };
    let text = |name: &str| header.get(name).and_then(Value::as_str).map(str::to_owned);

    Ok(UntrustedHeader {
        alg,
        typ: text("typ"),
        kid: text("kid"),
    })
}

fn parse_claims(bytes: &[u8]) -> JwtResult<Claims> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(claims)) => Ok(claims),
        Ok(other) => Err(JwtError::malformed_payload(format!(
            "claims must be a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(JwtError::malformed_payload(format!(
            "claims are not valid JSON: {e}"
        ))),
    }
}

fn accepted_algorithm(alg: &str, acceptable: &AlgorithmSet) -> JwtResult<Algorithm> {
    match alg.parse::<Algorithm>() {
        Ok(algorithm) if acceptable.contains(algorithm) => Ok(algorithm),
        _ => Err(JwtError::unsupported_algorithm(alg)),
    }
}
