//! Token encoding
//!
//! A token is `B64(header) "." B64(claims) "." B64(signature)` where the
//! signature covers the first two segments joined by the dot, exactly as
//! emitted.

use crate::algorithms::Algorithm;
use crate::base64url;
use crate::crypto;
use crate::error::{JwtError, JwtResult};
use crate::keys::SigningKey;
use crate::types::{Claims, Header};
use serde::Serialize;
use serde_json::Value;

/// Sign `claims` into a compact token
///
/// The header is `{"alg":<algorithm>,"typ":"JWT"}`. Claims are serialized
/// as given; no claim is added, checked or rewritten. For the same inputs
/// HMAC and RS* tokens are byte-identical across calls.
///
/// # Errors
/// [`JwtError::InvalidKey`] when `key` does not fit `algorithm`.
pub fn encode(claims: &Claims, key: &SigningKey, algorithm: Algorithm) -> JwtResult<String> {
    tracing::trace!(%algorithm, key = key.description(), "encoding token");

    let header = serde_json::to_vec(&Header::new(algorithm))
        .map_err(|e| JwtError::malformed_payload(format!("header serialization failed: {e}")))?;
    let payload = serde_json::to_vec(claims)
        .map_err(|e| JwtError::malformed_payload(format!("claims serialization failed: {e}")))?;

    let mut token = String::with_capacity((header.len() + payload.len()) * 4 / 3 + 8);
    token.push_str(&base64url::encode(&header));
    token.push('.');
    token.push_str(&base64url::encode(&payload));

    let signature = crypto::sign(token.as_bytes(), key, algorithm).inspect_err(|e| {
        tracing::debug!(%algorithm, kind = ?e.kind(), "token signing rejected");
    })?;

    token.push('.');
    token.push_str(&base64url::encode(&signature));
    Ok(token)
}

/// Sign any serializable claim type
///
/// `claims` must serialize to a JSON object.
///
/// # Errors
/// [`JwtError::MalformedPayload`] when `claims` does not serialize to an
/// object, otherwise as [`encode`].
pub fn encode_claims<T>(claims: &T, key: &SigningKey, algorithm: Algorithm) -> JwtResult<String>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(claims) {
        Ok(Value::Object(map)) => encode(&map, key, algorithm),
        Ok(other) => Err(JwtError::malformed_payload(format!(
            "claims must be a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(JwtError::malformed_payload(format!(
            "claims serialization failed: {e}"
        ))),
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
