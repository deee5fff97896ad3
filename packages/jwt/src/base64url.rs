//! Base64url transcoding for compact serialization (RFC 7515 §2)
//!
//! Encoding uses the URL-safe alphabet without `=` padding. Decoding
//! accepts the same alphabet with or without trailing padding and ignores
//! unused bits in the final symbol. Only symbols outside the alphabet and a
//! length of `4n + 1` are rejected.

use crate::error::{JwtError, JwtResult};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encode bytes as unpadded base64url
#[inline]
#[must_use]
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode base64url, padded or not
///
/// # Errors
/// Returns [`JwtError::MalformedEncoding`] for characters outside the
/// URL-safe alphabet or a length of `4n + 1`.
#[inline]
pub fn decode(input: impl AsRef<[u8]>) -> JwtResult<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(input)
        .map_err(|e| JwtError::MalformedEncoding {
            segment: None,
            reason: e.to_string(),
        })
}
