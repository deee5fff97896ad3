//! JWT error types
//!
//! Every failure of the encode and decode paths surfaces as one variant of
//! [`JwtError`]. Variants are terminal: nothing in this crate retries or
//! downgrades them.

use std::fmt;
use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Segment of a compact-serialized token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// First segment, the JOSE header
    Header,
    /// Second segment, the claim set
    Claims,
    /// Third segment, the signature
    Signature,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Segment::Header => "header",
            Segment::Claims => "claims",
            Segment::Signature => "signature",
        })
    }
}

/// JWT error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Token argument was empty
    #[error("No token supplied")]
    MissingToken,

    /// Token did not split into exactly three segments
    #[error("Malformed token: expected 3 segments, found {0}")]
    MalformedToken(usize),

    /// A segment (or a standalone codec input) was not canonical unpadded base64url
    #[error("Malformed base64url encoding in {}: {reason}", segment_label(.segment))]
    MalformedEncoding {
        /// Segment that failed to decode, `None` for direct codec calls
        segment: Option<Segment>,
        /// Decoder diagnostic
        reason: String,
    },

    /// Header or claims were not the JSON shape a token requires
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Algorithm is unknown or outside the caller's accepted set
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Key cannot be used with the selected algorithm
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Signature did not verify
    #[error("Signature verification failed")]
    SignatureInvalid,

    /// `nbf` lies in the future
    #[error("Token is not yet valid")]
    TokenNotYetValid,

    /// `exp` lies in the past
    #[error("Token has expired")]
    TokenExpired,

    /// A claim required by the validation policy is absent
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// `iss` does not match the validation policy
    #[error("Invalid issuer")]
    InvalidIssuer,

    /// `aud` does not contain an audience accepted by the validation policy
    #[error("Invalid audience")]
    InvalidAudience,
}

/// Payload-free discriminant of [`JwtError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`JwtError::MissingToken`]
    MissingToken,
    /// See [`JwtError::MalformedToken`]
    MalformedToken,
    /// See [`JwtError::MalformedEncoding`]
    MalformedEncoding,
    /// See [`JwtError::MalformedPayload`]
    MalformedPayload,
    /// See [`JwtError::UnsupportedAlgorithm`]
    UnsupportedAlgorithm,
    /// See [`JwtError::InvalidKey`]
    InvalidKey,
    /// See [`JwtError::SignatureInvalid`]
    SignatureInvalid,
    /// See [`JwtError::TokenNotYetValid`]
    TokenNotYetValid,
    /// See [`JwtError::TokenExpired`]
    TokenExpired,
    /// See [`JwtError::MissingClaim`]
    MissingClaim,
    /// See [`JwtError::InvalidIssuer`]
    InvalidIssuer,
    /// See [`JwtError::InvalidAudience`]
    InvalidAudience,
}

impl JwtError {
    /// Discriminant for branching without matching payloads
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            JwtError::MissingToken => ErrorKind::MissingToken,
            JwtError::MalformedToken(_) => ErrorKind::MalformedToken,
            JwtError::MalformedEncoding { .. } => ErrorKind::MalformedEncoding,
            JwtError::MalformedPayload(_) => ErrorKind::MalformedPayload,
            JwtError::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            JwtError::InvalidKey(_) => ErrorKind::InvalidKey,
            JwtError::SignatureInvalid => ErrorKind::SignatureInvalid,
            JwtError::TokenNotYetValid => ErrorKind::TokenNotYetValid,
            JwtError::TokenExpired => ErrorKind::TokenExpired,
            JwtError::MissingClaim(_) => ErrorKind::MissingClaim,
            JwtError::InvalidIssuer => ErrorKind::InvalidIssuer,
            JwtError::InvalidAudience => ErrorKind::InvalidAudience,
        }
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        JwtError::InvalidKey(msg.into())
    }

    /// Create a malformed payload error
    #[inline]
    #[must_use]
    pub fn malformed_payload(msg: impl Into<String>) -> Self {
        JwtError::MalformedPayload(msg.into())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: impl Into<String>) -> Self {
        JwtError::UnsupportedAlgorithm(alg.into())
    }

    /// Attach the failing segment to a codec error
    #[must_use]
    pub(crate) fn in_segment(self, segment: Segment) -> Self {
        match self {
            JwtError::MalformedEncoding { reason, .. } => JwtError::MalformedEncoding {
                segment: Some(segment),
                reason,
            },
            other => other,
        }
    }
}

fn segment_label(segment: &Option<Segment>) -> &'static str {
    match segment {
        Some(Segment::Header) => "header segment",
        Some(Segment::Claims) => "claims segment",
        Some(Segment::Signature) => "signature segment",
        None => "input",
    }
}
