//! JWT key material
//!
//! [`SigningKey`] and [`VerifyingKey`] are typed handles: the variant fixes
//! which algorithm family the key can serve, so a token can never be checked
//! with key bytes reinterpreted under a different family. PEM/DER parsing is
//! driven by the algorithm the caller names, never guessed from the input.

use crate::algorithms::Algorithm;
use crate::error::{JwtError, JwtResult};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use zeroize::Zeroizing;

/// Smallest RSA modulus accepted, in bits (RFC 7518 §3.3)
pub const MIN_RSA_MODULUS_BITS: usize = 2048;

/// Shared HMAC secret, wiped from memory on drop
#[derive(Clone)]
pub struct HmacSecret(Zeroizing<Vec<u8>>);

impl HmacSecret {
    /// Copy secret bytes into a new handle
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self(Zeroizing::new(secret.as_ref().to_vec()))
    }

    /// Raw secret bytes
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Check the secret is long enough for `algorithm`
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] when the secret is shorter than the
    /// digest output of `algorithm`, or when `algorithm` is not HMAC.
    pub fn check_strength(&self, algorithm: Algorithm) -> JwtResult<()> {
        let min_length = algorithm.min_secret_len().ok_or_else(|| {
            JwtError::invalid_key(format!("{algorithm} cannot use an HMAC secret"))
        })?;

        if self.0.len() < min_length {
            return Err(JwtError::invalid_key(format!(
                "HMAC key for {algorithm} must be at least {min_length} bytes, got {}",
                self.0.len()
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for HmacSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HmacSecret(<{} bytes redacted>)", self.0.len())
    }
}

/// Key used by the encode path
#[derive(Clone)]
pub enum SigningKey {
    /// Shared secret for HS256/HS384/HS512
    Hmac(HmacSecret),
    /// RSA private key for RS256/RS384/RS512
    Rsa(Box<RsaPrivateKey>),
    /// P-256 private key for ES256
    EcP256(p256::ecdsa::SigningKey),
    /// P-384 private key for ES384
    EcP384(p384::ecdsa::SigningKey),
}

/// Key used by the decode path
#[derive(Clone)]
pub enum VerifyingKey {
    /// Shared secret for HS256/HS384/HS512
    Hmac(HmacSecret),
    /// RSA public key for RS256/RS384/RS512
    Rsa(Box<RsaPublicKey>),
    /// P-256 public key for ES256
    EcP256(p256::ecdsa::VerifyingKey),
    /// P-384 public key for ES384
    EcP384(p384::ecdsa::VerifyingKey),
}

impl SigningKey {
    /// HMAC signing key from a shared secret
    #[must_use]
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Self {
        SigningKey::Hmac(HmacSecret::new(secret))
    }

    /// Parse a PEM private key in the shape `algorithm` requires
    ///
    /// RSA accepts PKCS#8 (`PRIVATE KEY`) and PKCS#1 (`RSA PRIVATE KEY`);
    /// EC accepts PKCS#8.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] for HMAC algorithms, unparseable
    /// input, a key on the wrong curve, or an RSA modulus below 2048 bits.
    pub fn from_pem(algorithm: Algorithm, pem: &str) -> JwtResult<Self> {
        use p256::pkcs8::DecodePrivateKey as _;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                Err(secret_required(algorithm))
            }
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                rsa_private_from_pem(pem).map(|key| SigningKey::Rsa(Box::new(key)))
            }
            Algorithm::ES256 => p256::ecdsa::SigningKey::from_pkcs8_pem(pem)
                .map(SigningKey::EcP256)
                .map_err(|e| {
                    JwtError::invalid_key(format!("Invalid EC private key for ES256: {e}"))
                }),
            Algorithm::ES384 => p384::ecdsa::SigningKey::from_pkcs8_pem(pem)
                .map(SigningKey::EcP384)
                .map_err(|e| {
                    JwtError::invalid_key(format!("Invalid EC private key for ES384: {e}"))
                }),
        }
    }

    /// Parse a DER private key in the shape `algorithm` requires
    ///
    /// # Errors
    /// Same conditions as [`SigningKey::from_pem`].
    pub fn from_der(algorithm: Algorithm, der: &[u8]) -> JwtResult<Self> {
        use p256::pkcs8::DecodePrivateKey as _;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                Err(secret_required(algorithm))
            }
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                rsa_private_from_der(der).map(|key| SigningKey::Rsa(Box::new(key)))
            }
            Algorithm::ES256 => p256::ecdsa::SigningKey::from_pkcs8_der(der)
                .map(SigningKey::EcP256)
                .map_err(|e| {
                    JwtError::invalid_key(format!("Invalid EC private key for ES256: {e}"))
                }),
            Algorithm::ES384 => p384::ecdsa::SigningKey::from_pkcs8_der(der)
                .map(SigningKey::EcP384)
                .map_err(|e| {
                    JwtError::invalid_key(format!("Invalid EC private key for ES384: {e}"))
                }),
        }
    }

    /// Matching verification key
    ///
    /// The same secret for HMAC, the public half for asymmetric keys.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        match self {
            SigningKey::Hmac(secret) => VerifyingKey::Hmac(secret.clone()),
            SigningKey::Rsa(key) => VerifyingKey::Rsa(Box::new(key.to_public_key())),
            SigningKey::EcP256(key) => VerifyingKey::EcP256(key.verifying_key().clone()),
            SigningKey::EcP384(key) => VerifyingKey::EcP384(key.verifying_key().clone()),
        }
    }

    pub(crate) fn description(&self) -> &'static str {
        match self {
            SigningKey::Hmac(_) => "an HMAC secret",
            SigningKey::Rsa(_) => "an RSA private key",
            SigningKey::EcP256(_) => "a P-256 private key",
            SigningKey::EcP384(_) => "a P-384 private key",
        }
    }
}

impl VerifyingKey {
    /// HMAC verification key from a shared secret
    #[must_use]
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Self {
        VerifyingKey::Hmac(HmacSecret::new(secret))
    }

    /// Parse a PEM public key in the shape `algorithm` requires
    ///
    /// RSA accepts SubjectPublicKeyInfo (`PUBLIC KEY`) and PKCS#1
    /// (`RSA PUBLIC KEY`); EC accepts SubjectPublicKeyInfo.
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] for HMAC algorithms, unparseable
    /// input, a key on the wrong curve, or an RSA modulus below 2048 bits.
    pub fn from_pem(algorithm: Algorithm, pem: &str) -> JwtResult<Self> {
        use p256::pkcs8::DecodePublicKey as _;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                Err(secret_required(algorithm))
            }
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                rsa_public_from_pem(pem).map(|key| VerifyingKey::Rsa(Box::new(key)))
            }
            Algorithm::ES256 => p256::ecdsa::VerifyingKey::from_public_key_pem(pem)
                .map(VerifyingKey::EcP256)
                .map_err(|e| {
                    JwtError::invalid_key(format!("Invalid EC public key for ES256: {e}"))
                }),
            Algorithm::ES384 => p384::ecdsa::VerifyingKey::from_public_key_pem(pem)
                .map(VerifyingKey::EcP384)
                .map_err(|e| {
                    JwtError::invalid_key(format!("Invalid EC public key for ES384: {e}"))
                }),
        }
    }

    /// Parse a DER public key in the shape `algorithm` requires
    ///
    /// # Errors
    /// Same conditions as [`VerifyingKey::from_pem`].
    pub fn from_der(algorithm: Algorithm, der: &[u8]) -> JwtResult<Self> {
        use p256::pkcs8::DecodePublicKey as _;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                Err(secret_required(algorithm))
            }
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                rsa_public_from_der(der).map(|key| VerifyingKey::Rsa(Box::new(key)))
            }
            Algorithm::ES256 => p256::ecdsa::VerifyingKey::from_public_key_der(der)
                .map(VerifyingKey::EcP256)
                .map_err(|e| {
                    JwtError::invalid_key(format!("Invalid EC public key for ES256: {e}"))
                }),
            Algorithm::ES384 => p384::ecdsa::VerifyingKey::from_public_key_der(der)
                .map(VerifyingKey::EcP384)
                .map_err(|e| {
                    JwtError::invalid_key(format!("Invalid EC public key for ES384: {e}"))
                }),
        }
    }

    /// Parse a SEC1-encoded curve point (compressed or uncompressed)
    ///
    /// # Errors
    /// Returns [`JwtError::InvalidKey`] unless `algorithm` is ECDSA and the
    /// bytes are a valid point on its curve.
    pub fn from_ec_point(algorithm: Algorithm, point: &[u8]) -> JwtResult<Self> {
        match algorithm {
            Algorithm::ES256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(point)
                .map(VerifyingKey::EcP256)
                .map_err(|_| JwtError::invalid_key("Invalid SEC1 point for ES256")),
            Algorithm::ES384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(point)
                .map(VerifyingKey::EcP384)
                .map_err(|_| JwtError::invalid_key("Invalid SEC1 point for ES384")),
            other => Err(JwtError::invalid_key(format!(
                "{other} keys are not curve points"
            ))),
        }
    }

    pub(crate) fn description(&self) -> &'static str {
        match self {
            VerifyingKey::Hmac(_) => "an HMAC secret",
            VerifyingKey::Rsa(_) => "an RSA public key",
            VerifyingKey::EcP256(_) => "a P-256 public key",
            VerifyingKey::EcP384(_) => "a P-384 public key",
        }
    }
}

impl From<RsaPrivateKey> for SigningKey {
    fn from(key: RsaPrivateKey) -> Self {
        SigningKey::Rsa(Box::new(key))
    }
}

impl From<p256::ecdsa::SigningKey> for SigningKey {
    fn from(key: p256::ecdsa::SigningKey) -> Self {
        SigningKey::EcP256(key)
    }
}

impl From<p384::ecdsa::SigningKey> for SigningKey {
    fn from(key: p384::ecdsa::SigningKey) -> Self {
        SigningKey::EcP384(key)
    }
}

impl From<RsaPublicKey> for VerifyingKey {
    fn from(key: RsaPublicKey) -> Self {
        VerifyingKey::Rsa(Box::new(key))
    }
}

impl From<p256::ecdsa::VerifyingKey> for VerifyingKey {
    fn from(key: p256::ecdsa::VerifyingKey) -> Self {
        VerifyingKey::EcP256(key)
    }
}

impl From<p384::ecdsa::VerifyingKey> for VerifyingKey {
    fn from(key: p384::ecdsa::VerifyingKey) -> Self {
        VerifyingKey::EcP384(key)
    }
}

impl From<&SigningKey> for VerifyingKey {
    fn from(key: &SigningKey) -> Self {
        key.verifying_key()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningKey::Hmac(secret) => f.debug_tuple("Hmac").field(secret).finish(),
            SigningKey::Rsa(key) => write!(f, "Rsa(<{}-bit private key>)", key.n().bits()),
            SigningKey::EcP256(_) => f.write_str("EcP256(<private key>)"),
            SigningKey::EcP384(_) => f.write_str("EcP384(<private key>)"),
        }
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyingKey::Hmac(secret) => f.debug_tuple("Hmac").field(secret).finish(),
            VerifyingKey::Rsa(key) => write!(f, "Rsa(<{}-bit public key>)", key.n().bits()),
            VerifyingKey::EcP256(key) => f.debug_tuple("EcP256").field(key).finish(),
            VerifyingKey::EcP384(key) => f.debug_tuple("EcP384").field(key).finish(),
        }
    }
}

/// Reject RSA moduli below [`MIN_RSA_MODULUS_BITS`]
pub(crate) fn check_rsa_modulus(key: &impl PublicKeyParts) -> JwtResult<()> {
    let bits = key.n().bits();
    if bits < MIN_RSA_MODULUS_BITS {
        return Err(JwtError::invalid_key(format!(
            "RSA modulus must be at least {MIN_RSA_MODULUS_BITS} bits, got {bits}"
        )));
    }
    Ok(())
}

fn secret_required(algorithm: Algorithm) -> JwtError {
    JwtError::invalid_key(format!("{algorithm} takes a shared secret, not an encoded key"))
}

fn rsa_private_from_pem(pem: &str) -> JwtResult<RsaPrivateKey> {
    use rsa::pkcs1::DecodeRsaPrivateKey;
    use rsa::pkcs8::DecodePrivateKey;

    let key = <RsaPrivateKey as DecodePrivateKey>::from_pkcs8_pem(pem)
        .or_else(|_| <RsaPrivateKey as DecodeRsaPrivateKey>::from_pkcs1_pem(pem))
        .map_err(|e| JwtError::invalid_key(format!("Invalid RSA private key: {e}")))?;
    check_rsa_modulus(&key)?;
    Ok(key)
}

fn rsa_private_from_der(der: &[u8]) -> JwtResult<RsaPrivateKey> {
    use rsa::pkcs1::DecodeRsaPrivateKey;
    use rsa::pkcs8::DecodePrivateKey;

    let key = <RsaPrivateKey as DecodePrivateKey>::from_pkcs8_der(der)
        .or_else(|_| <RsaPrivateKey as DecodeRsaPrivateKey>::from_pkcs1_der(der))
        .map_err(|e| JwtError::invalid_key(format!("Invalid RSA private key: {e}")))?;
    check_rsa_modulus(&key)?;
    Ok(key)
}

fn rsa_public_from_pem(pem: &str) -> JwtResult<RsaPublicKey> {
    use rsa::pkcs1::DecodeRsaPublicKey;
    use rsa::pkcs8::DecodePublicKey;

    let key = <RsaPublicKey as DecodePublicKey>::from_public_key_pem(pem)
        .or_else(|_| <RsaPublicKey as DecodeRsaPublicKey>::from_pkcs1_pem(pem))
        .map_err(|e| JwtError::invalid_key(format!("Invalid RSA public key: {e}")))?;
    check_rsa_modulus(&key)?;
    Ok(key)
}

fn rsa_public_from_der(der: &[u8]) -> JwtResult<RsaPublicKey> {
    use rsa::pkcs1::DecodeRsaPublicKey;
    use rsa::pkcs8::DecodePublicKey;

    let key = <RsaPublicKey as DecodePublicKey>::from_public_key_der(der)
        .or_else(|_| <RsaPublicKey as DecodeRsaPublicKey>::from_pkcs1_der(der))
        .map_err(|e| JwtError::invalid_key(format!("Invalid RSA public key: {e}")))?;
    check_rsa_modulus(&key)?;
    Ok(key)
}
