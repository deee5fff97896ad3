//! HMAC-SHA2 for HS256, HS384 and HS512

use crate::algorithms::DigestAlgorithm;
use crate::error::{JwtError, JwtResult};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

#[inline]
pub(crate) fn sign(digest: DigestAlgorithm, secret: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    match digest {
        DigestAlgorithm::Sha256 => mac::<HmacSha256>(secret, message),
        DigestAlgorithm::Sha384 => mac::<HmacSha384>(secret, message),
        DigestAlgorithm::Sha512 => mac::<HmacSha512>(secret, message),
    }
}

/// Recompute the tag and compare without early exit
#[inline]
pub(crate) fn verify(
    digest: DigestAlgorithm,
    secret: &[u8],
    message: &[u8],
    signature: &[u8],
) -> JwtResult<bool> {
    let expected = sign(digest, secret, message)?;
    Ok(expected.as_slice().ct_eq(signature).into())
}

fn mac<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(secret)
        .map_err(|_| JwtError::invalid_key("Invalid HMAC key"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
