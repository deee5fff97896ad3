//! Claims builder
//!
//! Convenience for assembling a [`Claims`] map with the registered claims of
//! RFC 7519 §4.1. The result is an ordinary map; nothing here is required by
//! the encode path.

use crate::types::Claims;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Builder for a claim set
#[derive(Debug, Clone, Default)]
pub struct ClaimsBuilder {
    claims: Claims,
}

impl ClaimsBuilder {
    /// Create an empty claims builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the issuer (`iss`)
    #[inline]
    #[must_use]
    pub fn issuer(self, issuer: impl Into<String>) -> Self {
        self.claim("iss", Value::String(issuer.into()))
    }

    /// Set the subject (`sub`)
    #[inline]
    #[must_use]
    pub fn subject(self, subject: impl Into<String>) -> Self {
        self.claim("sub", Value::String(subject.into()))
    }

    /// Set a single audience (`aud` as a string)
    #[inline]
    #[must_use]
    pub fn audience(self, audience: impl Into<String>) -> Self {
        self.claim("aud", Value::String(audience.into()))
    }

    /// Set several audiences (`aud` as an array)
    #[must_use]
    pub fn audiences<I, S>(self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = audiences
            .into_iter()
            .map(|aud| Value::String(aud.into()))
            .collect();
        self.claim("aud", Value::Array(values))
    }

    /// Set the expiry (`exp`) in Unix seconds
    #[inline]
    #[must_use]
    pub fn expiration(self, exp: i64) -> Self {
        self.claim("exp", Value::from(exp))
    }

    /// Set the expiry relative to now
    #[inline]
    #[must_use]
    pub fn expires_in(self, duration: Duration) -> Self {
        self.expiration((Utc::now() + duration).timestamp())
    }

    /// Set the not-before time (`nbf`)
    #[inline]
    #[must_use]
    pub fn not_before(self, nbf: DateTime<Utc>) -> Self {
        self.claim("nbf", Value::from(nbf.timestamp()))
    }

    /// Set the issued-at time (`iat`)
    #[inline]
    #[must_use]
    pub fn issued_at(self, iat: DateTime<Utc>) -> Self {
        self.claim("iat", Value::from(iat.timestamp()))
    }

    /// Set the issued-at time to now
    #[inline]
    #[must_use]
    pub fn issued_now(self) -> Self {
        self.issued_at(Utc::now())
    }

    /// Set the JWT ID (`jti`)
    #[inline]
    #[must_use]
    pub fn jwt_id(self, jti: impl Into<String>) -> Self {
        self.claim("jti", Value::String(jti.into()))
    }

    /// Set any claim, replacing an earlier value under the same name
    #[inline]
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    /// Finish building
    #[inline]
    #[must_use]
    pub fn build(self) -> Claims {
        self.claims
    }
}
