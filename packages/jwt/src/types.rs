//! JWT type definitions

use crate::algorithms::Algorithm;
use serde::{Deserialize, Serialize};

/// Claim set carried by a token
///
/// A plain JSON object. `exp` and `nbf` are the only keys the decode path
/// interprets by default; everything else is opaque application data.
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Value of the `typ` header parameter
pub const JWT_TYPE: &str = "JWT";

/// JOSE header written by the encode path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signature algorithm
    pub alg: Algorithm,
    /// Media type, always `JWT` on encode
    pub typ: String,
}

impl Header {
    /// Header for `alg` with `typ` set to `JWT`
    #[must_use]
    pub fn new(alg: Algorithm) -> Self {
        Self {
            alg,
            typ: JWT_TYPE.to_string(),
        }
    }
}

/// Header as found in an untrusted token
///
/// `alg` is kept as the raw string so that an unregistered value can be
/// reported verbatim; resolving it against the registry is the parser's job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UntrustedHeader {
    /// Raw `alg` parameter
    pub alg: String,
    /// Raw `typ` parameter, if present
    #[serde(default)]
    pub typ: Option<String>,
    /// Raw `kid` parameter, if present
    #[serde(default)]
    pub kid: Option<String>,
}
