//! RSASSA-PKCS1-v1_5 for RS256, RS384 and RS512
//!
//! Keys are borrowed; the message is hashed here and the padding scheme
//! carries the digest OID.

use crate::algorithms::DigestAlgorithm;
use crate::error::{JwtError, JwtResult};
use crate::keys::check_rsa_modulus;
use rsa::sha2::{Digest, Sha256, Sha384, Sha512};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};

fn hashed(digest: DigestAlgorithm, message: &[u8]) -> (Pkcs1v15Sign, Vec<u8>) {
    match digest {
        DigestAlgorithm::Sha256 => (
            Pkcs1v15Sign::new::<Sha256>(),
            Sha256::digest(message).to_vec(),
        ),
        DigestAlgorithm::Sha384 => (
            Pkcs1v15Sign::new::<Sha384>(),
            Sha384::digest(message).to_vec(),
        ),
        DigestAlgorithm::Sha512 => (
            Pkcs1v15Sign::new::<Sha512>(),
            Sha512::digest(message).to_vec(),
        ),
    }
}

pub(crate) fn sign(
    digest: DigestAlgorithm,
    private_key: &RsaPrivateKey,
    message: &[u8],
) -> JwtResult<Vec<u8>> {
    check_rsa_modulus(private_key)?;

    let (scheme, hash) = hashed(digest, message);
    private_key
        .sign(scheme, &hash)
        .map_err(|e| JwtError::invalid_key(format!("RSA signing failed: {e}")))
}

pub(crate) fn verify(
    digest: DigestAlgorithm,
    public_key: &RsaPublicKey,
    message: &[u8],
    signature: &[u8],
) -> JwtResult<bool> {
    check_rsa_modulus(public_key)?;

    let (scheme, hash) = hashed(digest, message);
    Ok(public_key.verify(scheme, &hash, signature).is_ok())
}
