//! Algorithm registry
//!
//! The supported signature algorithms form a closed enum. Every property the
//! signer, verifier and key layer need (JWT `alg` string, digest, primitive
//! family, key shape) is a `const fn` over that enum, so adding an algorithm
//! is a compile-checked change to the matches below and nothing else.

use crate::error::JwtError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Supported JWS signature algorithms (RFC 7518 §3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
}

/// Signing primitive behind an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// Keyed hash with a shared secret
    Hmac,
    /// RSASSA-PKCS1-v1_5
    Rsa,
    /// ECDSA with fixed-width `r || s` signatures
    Ecdsa,
}

/// Digest used by an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl DigestAlgorithm {
    /// Digest output length in bytes
    #[inline]
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }
}

impl Algorithm {
    /// Every registered algorithm, in registry order
    pub const ALL: [Algorithm; 8] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::ES256,
        Algorithm::ES384,
    ];

    /// The `alg` header value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
        }
    }

    /// Signing primitive family
    #[must_use]
    pub const fn family(self) -> AlgorithmFamily {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => AlgorithmFamily::Hmac,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => AlgorithmFamily::Rsa,
            Algorithm::ES256 | Algorithm::ES384 => AlgorithmFamily::Ecdsa,
        }
    }

    /// Digest the primitive runs over the signing input
    #[must_use]
    pub const fn digest(self) -> DigestAlgorithm {
        match self {
            Algorithm::HS256 | Algorithm::RS256 | Algorithm::ES256 => DigestAlgorithm::Sha256,
            Algorithm::HS384 | Algorithm::RS384 | Algorithm::ES384 => DigestAlgorithm::Sha384,
            Algorithm::HS512 | Algorithm::RS512 => DigestAlgorithm::Sha512,
        }
    }

    /// Whether signer and verifier share one secret
    #[inline]
    #[must_use]
    pub const fn is_symmetric(self) -> bool {
        matches!(self.family(), AlgorithmFamily::Hmac)
    }

    /// Minimum HMAC secret length in bytes, `None` for asymmetric algorithms
    ///
    /// RFC 7518 §3.2 requires a key at least as long as the hash output.
    #[must_use]
    pub const fn min_secret_len(self) -> Option<usize> {
        if self.is_symmetric() {
            Some(self.digest().output_len())
        } else {
            None
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl Default for Algorithm {
    /// RS512
    fn default() -> Self {
        Algorithm::RS512
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = JwtError;

    /// Exact, case-sensitive lookup. `none` and anything unregistered fail.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| JwtError::unsupported_algorithm(s))
    }
}

impl Serialize for Algorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Set of algorithms a caller is willing to accept on decode
///
/// `Copy` and allocation-free; build one per verifier and share it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AlgorithmSet {
    bits: u16,
}

impl AlgorithmSet {
    /// Set accepting nothing
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Set holding exactly one algorithm
    #[inline]
    #[must_use]
    pub const fn only(algorithm: Algorithm) -> Self {
        Self {
            bits: algorithm.bit(),
        }
    }

    /// Set holding every registered algorithm
    #[must_use]
    pub fn all() -> Self {
        Algorithm::ALL.into_iter().collect()
    }

    /// Set holding every algorithm of one family
    #[must_use]
    pub fn family(family: AlgorithmFamily) -> Self {
        Algorithm::ALL
            .into_iter()
            .filter(|alg| alg.family() == family)
            .collect()
    }

    /// Add an algorithm
    #[inline]
    #[must_use]
    pub const fn with(self, algorithm: Algorithm) -> Self {
        Self {
            bits: self.bits | algorithm.bit(),
        }
    }

    /// Membership test
    #[inline]
    #[must_use]
    pub const fn contains(self, algorithm: Algorithm) -> bool {
        self.bits & algorithm.bit() != 0
    }

    /// Whether the set accepts nothing
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Members in registry order
    pub fn iter(self) -> impl Iterator<Item = Algorithm> {
        Algorithm::ALL
            .into_iter()
            .filter(move |alg| self.contains(*alg))
    }
}

impl From<Algorithm> for AlgorithmSet {
    fn from(algorithm: Algorithm) -> Self {
        Self::only(algorithm)
    }
}

impl FromIterator<Algorithm> for AlgorithmSet {
    fn from_iter<I: IntoIterator<Item = Algorithm>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl<const N: usize> From<[Algorithm; N]> for AlgorithmSet {
    fn from(algorithms: [Algorithm; N]) -> Self {
        algorithms.into_iter().collect()
    }
}

impl fmt::Debug for AlgorithmSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
