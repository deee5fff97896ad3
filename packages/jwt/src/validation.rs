//! JWT validation policy
//!
//! [`Validation::new`] is the strict policy: only the listed algorithms,
//! `nbf` and `exp` enforced against the current time with no leeway, and no
//! other claim inspected. The `with_*`/`expect_*` methods layer optional
//! checks on top.

use crate::algorithms::AlgorithmSet;
use crate::error::{JwtError, JwtResult};
use crate::types::Claims;
use chrono::Utc;
use serde_json::Value;

/// JWT validation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Algorithms a token may be signed with
    pub algorithms: AlgorithmSet,
    /// Seconds of clock skew tolerated by both temporal checks
    pub leeway: u64,
    /// Enforce `exp`
    pub validate_exp: bool,
    /// Enforce `nbf`
    pub validate_nbf: bool,
    /// Claims that must be present
    pub required_claims: Vec<String>,
    /// Expected `iss`
    pub issuer: Option<String>,
    /// Accepted audiences; `aud` must contain at least one
    pub audience: Option<Vec<String>>,
    /// Evaluation time in Unix seconds, wall clock when `None`
    pub current_time: Option<i64>,
}

impl Validation {
    /// Strict policy accepting `algorithms`
    #[must_use]
    pub fn new(algorithms: impl Into<AlgorithmSet>) -> Self {
        Self {
            algorithms: algorithms.into(),
            leeway: 0,
            validate_exp: true,
            validate_nbf: true,
            required_claims: Vec::new(),
            issuer: None,
            audience: None,
            current_time: None,
        }
    }

    /// Replace the accepted algorithms
    #[must_use]
    pub fn with_algorithms(mut self, algorithms: impl Into<AlgorithmSet>) -> Self {
        self.algorithms = algorithms.into();
        self
    }

    /// Tolerate `leeway` seconds of clock skew
    #[must_use]
    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    /// Set whether to validate expiration
    #[must_use]
    pub fn validate_expiration(mut self, validate: bool) -> Self {
        self.validate_exp = validate;
        self
    }

    /// Set whether to validate not-before
    #[must_use]
    pub fn validate_not_before(mut self, validate: bool) -> Self {
        self.validate_nbf = validate;
        self
    }

    /// Add a required claim
    #[must_use]
    pub fn require_claim(mut self, claim: impl Into<String>) -> Self {
        self.required_claims.push(claim.into());
        self
    }

    /// Set expected issuer
    #[must_use]
    pub fn expect_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set accepted audiences
    #[must_use]
    pub fn expect_audience<I, S>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audience = Some(audience.into_iter().map(Into::into).collect());
        self
    }

    /// Evaluate temporal claims at a fixed Unix time instead of the wall clock
    #[must_use]
    pub fn at_time(mut self, unix_seconds: i64) -> Self {
        self.current_time = Some(unix_seconds);
        self
    }

    /// Run every claim check of this policy against verified claims
    ///
    /// `nbf` is checked before `exp`; the optional checks follow in field
    /// order.
    ///
    /// # Errors
    /// [`JwtError::TokenNotYetValid`], [`JwtError::TokenExpired`],
    /// [`JwtError::MalformedPayload`] for a non-numeric `nbf`/`exp`, and
    /// [`JwtError::MissingClaim`], [`JwtError::InvalidIssuer`] or
    /// [`JwtError::InvalidAudience`] for the optional checks.
    pub fn check_claims(&self, claims: &Claims) -> JwtResult<()> {
        self.check_temporal_claims(claims)?;

        if let Some(missing) = self
            .required_claims
            .iter()
            .find(|name| !claims.contains_key(name.as_str()))
        {
            return Err(JwtError::MissingClaim(missing.clone()));
        }

        if let Some(expected) = &self.issuer {
            match claims.get("iss").and_then(Value::as_str) {
                Some(iss) if iss == expected => {}
                _ => return Err(JwtError::InvalidIssuer),
            }
        }

        if let Some(accepted) = &self.audience {
            let matches = |aud: &str| accepted.iter().any(|a| a == aud);
            let found = match claims.get("aud") {
                Some(Value::String(aud)) => matches(aud),
                Some(Value::Array(auds)) => auds.iter().filter_map(Value::as_str).any(matches),
                _ => false,
            };
            if !found {
                return Err(JwtError::InvalidAudience);
            }
        }

        Ok(())
    }

    fn check_temporal_claims(&self, claims: &Claims) -> JwtResult<()> {
        let now = self.current_time.unwrap_or_else(|| Utc::now().timestamp()) as f64;
        let leeway = self.leeway as f64;

        if self.validate_nbf
            && let Some(nbf) = numeric_date(claims, "nbf")?
            && now + leeway < nbf
        {
            return Err(JwtError::TokenNotYetValid);
        }

        if self.validate_exp
            && let Some(exp) = numeric_date(claims, "exp")?
            && now - leeway > exp
        {
            return Err(JwtError::TokenExpired);
        }

        Ok(())
    }
}

/// Read a NumericDate claim; present-but-not-a-number is malformed, not absent
fn numeric_date(claims: &Claims, name: &str) -> JwtResult<Option<f64>> {
    claims
        .get(name)
        .map(|value| {
            value.as_f64().ok_or_else(|| {
                JwtError::malformed_payload(format!("{name} must be a number of seconds"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::Algorithm;
    use crate::error::ErrorKind;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn claims(value: Value) -> Claims {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn strict() -> Validation {
        Validation::new(Algorithm::HS256).at_time(NOW)
    }

    fn kind(result: JwtResult<()>) -> ErrorKind {
        result.unwrap_err().kind()
    }

    #[test]
    fn test_no_temporal_claims_passes() {
        assert!(strict().check_claims(&claims(json!({"sub": "x"}))).is_ok());
    }

    #[test]
    fn test_expiry_boundary() {
        let policy = strict();
        assert!(policy.check_claims(&claims(json!({"exp": NOW}))).is_ok());
        assert!(policy.check_claims(&claims(json!({"exp": NOW + 3600}))).is_ok());
        assert_eq!(
            kind(policy.check_claims(&claims(json!({"exp": NOW - 1})))),
            ErrorKind::TokenExpired
        );
    }

    #[test]
    fn test_not_before_boundary() {
        let policy = strict();
        assert!(policy.check_claims(&claims(json!({"nbf": NOW}))).is_ok());
        assert!(policy.check_claims(&claims(json!({"nbf": NOW - 10}))).is_ok());
        assert_eq!(
            kind(policy.check_claims(&claims(json!({"nbf": NOW + 3600})))),
            ErrorKind::TokenNotYetValid
        );
    }

    #[test]
    fn test_not_before_is_checked_first() {
        let both = claims(json!({"nbf": NOW + 10, "exp": NOW - 10}));
        assert_eq!(kind(strict().check_claims(&both)), ErrorKind::TokenNotYetValid);
    }

    #[test]
    fn test_zero_and_fractional_dates_are_enforced() {
        assert_eq!(
            kind(strict().check_claims(&claims(json!({"exp": 0})))),
            ErrorKind::TokenExpired
        );
        assert_eq!(
            kind(strict().check_claims(&claims(json!({"exp": (NOW as f64) - 0.5})))),
            ErrorKind::TokenExpired
        );
        assert!(strict().check_claims(&claims(json!({"exp": (NOW as f64) + 0.5}))).is_ok());
    }

    #[test]
    fn test_non_numeric_dates_are_malformed() {
        for bad in [json!("2030-01-01"), json!(null), json!({"t": 1}), json!(true)] {
            assert_eq!(
                kind(strict().check_claims(&claims(json!({"exp": bad.clone()})))),
                ErrorKind::MalformedPayload
            );
            assert_eq!(
                kind(strict().check_claims(&claims(json!({"nbf": bad})))),
                ErrorKind::MalformedPayload
            );
        }
    }

    #[test]
    fn test_leeway_widens_both_checks() {
        let policy = strict().with_leeway(30);
        assert!(policy.check_claims(&claims(json!({"exp": NOW - 30}))).is_ok());
        assert!(policy.check_claims(&claims(json!({"nbf": NOW + 30}))).is_ok());
        assert_eq!(
            kind(policy.check_claims(&claims(json!({"exp": NOW - 31})))),
            ErrorKind::TokenExpired
        );
    }

    #[test]
    fn test_disabled_checks_ignore_claims() {
        let policy = strict().validate_expiration(false).validate_not_before(false);
        assert!(
            policy
                .check_claims(&claims(json!({"exp": NOW - 1, "nbf": "later"})))
                .is_ok()
        );
    }

    #[test]
    fn test_required_claims() {
        let policy = strict().require_claim("sub").require_claim("exp");
        let err = policy.check_claims(&claims(json!({"sub": "x"}))).unwrap_err();
        assert_eq!(err, JwtError::MissingClaim("exp".to_string()));
    }

    #[test]
    fn test_issuer() {
        let policy = strict().expect_issuer("https://example.com");
        assert!(policy.check_claims(&claims(json!({"iss": "https://example.com"}))).is_ok());
        assert_eq!(
            kind(policy.check_claims(&claims(json!({"iss": "https://evil.example"})))),
            ErrorKind::InvalidIssuer
        );
        assert_eq!(kind(policy.check_claims(&claims(json!({})))), ErrorKind::InvalidIssuer);
    }

    #[test]
    fn test_audience_string_or_array() {
        let policy = strict().expect_audience(["api", "web"]);
        assert!(policy.check_claims(&claims(json!({"aud": "web"}))).is_ok());
        assert!(policy.check_claims(&claims(json!({"aud": ["cli", "api"]}))).is_ok());
        assert_eq!(
            kind(policy.check_claims(&claims(json!({"aud": ["cli"]})))),
            ErrorKind::InvalidAudience
        );
        assert_eq!(
            kind(policy.check_claims(&claims(json!({"aud": 7})))),
            ErrorKind::InvalidAudience
        );
    }
}
