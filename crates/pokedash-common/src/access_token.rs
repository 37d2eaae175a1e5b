//! Types defining the pokedash access token.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

/// Claims for the pokedash Access Token JWT.
///
/// Only `exp` is required. Any claim the server adds beyond the known ones is kept in `extra`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AccessTokenClaims {
    /// Expiration time as a NumericDate: seconds since the unix epoch, possibly fractional.
    pub exp: f64,

    /// Issued at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,

    /// The subject the token was issued for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Username of the session owner, if the server embeds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Role of the session owner, if the server embeds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Unrecognized claims.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AccessTokenClaims {
    /// The expiry expressed in milliseconds since the unix epoch.
    pub fn expires_at_millis(&self) -> f64 {
        self.exp * 1000.0
    }
}

/// An error decoding an access token.
#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    /// The token is not made of three dot-separated segments.
    #[error("access token is not a compact JWT")]
    Malformed,

    /// The payload segment is not base64url.
    #[error("undecodable access token payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload is not a JSON claims object with a numeric `exp`.
    #[error("invalid access token claims: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Decode the claims of a compact JWT without verifying its signature.
///
/// The signing secret is held by the server only, so the client can inspect but never
/// authenticate its own token. Only the payload segment is read: the header and its `alg`
/// are ignored and no claim is validated here, not even `exp`.
pub fn decode_unverified(token: &str) -> Result<AccessTokenClaims, TokenError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    // some encoders keep the padding
    let payload = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;

    Ok(serde_json::from_slice(&payload)?)
}
