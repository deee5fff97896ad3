//! JWT builder entry point
//!
//! `Jwt::builder()` bundles a signing algorithm with a validation policy so
//! both can be configured once and shared. The builder holds no key material
//! and no mutable state; it is `Clone + Send + Sync`.

use crate::algorithms::{Algorithm, AlgorithmSet};
use crate::decode::{decode_claims, decode_with};
use crate::encode::{encode, encode_claims};
use crate::error::JwtResult;
use crate::keys::{SigningKey, VerifyingKey};
use crate::types::Claims;
use crate::validation::Validation;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Direct builder entry point
pub struct Jwt;

impl Jwt {
    /// Create new JWT builder
    #[inline]
    #[must_use]
    pub fn builder() -> JwtBuilder {
        JwtBuilder::new()
    }
}

/// Configured signer and verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtBuilder {
    algorithm: Algorithm,
    validation: Validation,
}

impl Default for JwtBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JwtBuilder {
    /// RS512 signing, accepting only RS512 on verify
    #[must_use]
    pub fn new() -> Self {
        let algorithm = Algorithm::default();
        Self {
            algorithm,
            validation: Validation::new(algorithm),
        }
    }

    /// Sign with `algorithm` and accept only `algorithm` on verify
    #[inline]
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self.validation.algorithms = AlgorithmSet::only(algorithm);
        self
    }

    /// Accept `algorithms` on verify, leaving the signing algorithm alone
    #[inline]
    #[must_use]
    pub fn accept_algorithms(mut self, algorithms: impl Into<AlgorithmSet>) -> Self {
        self.validation.algorithms = algorithms.into();
        self
    }

    /// Replace the whole validation policy
    #[inline]
    #[must_use]
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Signing algorithm
    #[inline]
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Validation policy used by [`JwtBuilder::verify`]
    #[inline]
    #[must_use]
    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    /// Sign a claims map
    ///
    /// # Errors
    /// As [`encode`].
    pub fn sign(&self, claims: &Claims, key: &SigningKey) -> JwtResult<String> {
        encode(claims, key, self.algorithm)
    }

    /// Sign any serializable claim type
    ///
    /// # Errors
    /// As [`encode_claims`].
    pub fn sign_claims<T>(&self, claims: &T, key: &SigningKey) -> JwtResult<String>
    where
        T: Serialize + ?Sized,
    {
        encode_claims(claims, key, self.algorithm)
    }

    /// Verify a token and return its claims
    ///
    /// # Errors
    /// As [`decode_with`].
    pub fn verify(&self, token: &str, key: &VerifyingKey) -> JwtResult<Claims> {
        decode_with(token, key, &self.validation)
    }

    /// Verify a token and deserialize its claims
    ///
    /// # Errors
    /// As [`decode_claims`].
    pub fn verify_claims<T>(&self, token: &str, key: &VerifyingKey) -> JwtResult<T>
    where
        T: DeserializeOwned,
    {
        decode_claims(token, key, &self.validation)
    }
}
