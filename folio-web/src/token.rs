// Folio - A flat-file CMS built with Rust
// Copyright (C) 2025 Folio Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Signed, time-bounded tokens carrying a claims object.
//!
//! Tokens are HS256 JWTs. The caller's claims are flattened next to the
//! standard `iat` and `exp` fields. Verification is all-or-nothing: a
//! malformed token, a bad signature and an expired token all come back as
//! `None`, and only the debug log tells them apart.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Used when no `SESSION_SECRET` is configured. Anyone who knows it can
/// forge sessions, so it must never be relied on in production.
pub const DEFAULT_SESSION_SECRET: &str = "folio-insecure-default-session-secret-change-me";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<C> {
    iat: i64,
    exp: i64,
    #[serde(flatten)]
    claims: C,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Codec for the configured secret, falling back to
    /// [`DEFAULT_SESSION_SECRET`] with a warning.
    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret.filter(|s| !s.is_empty()) {
            Some(secret) => Self::new(secret),
            None => {
                tracing::warn!(
                    "SESSION_SECRET is not set; sessions are signed with the built-in default \
                     secret and can be forged. Set SESSION_SECRET before exposing this server."
                );
                Self::new(DEFAULT_SESSION_SECRET)
            }
        }
    }

    pub fn issue<C: Serialize>(&self, claims: &C, ttl: Duration) -> anyhow::Result<String> {
        self.issue_at(claims, ttl, Utc::now())
    }

    /// Sign `claims` as if issued at `now`
    pub fn issue_at<C: Serialize>(
        &self,
        claims: &C,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> anyhow::Result<String> {
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| anyhow::anyhow!("Token lifetime {} overflows the clock", ttl))?;
        let envelope = Envelope {
            iat: now.timestamp(),
            exp: exp.timestamp(),
            claims,
        };
        let token = encode(&Header::new(Algorithm::HS256), &envelope, &self.encoding)?;
        Ok(token)
    }

    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Option<C> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` against the clock reading `now`
    pub fn verify_at<C: DeserializeOwned>(&self, token: &str, now: DateTime<Utc>) -> Option<C> {
        match self.decode_at(token, now) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(reason = %e, "Rejected session token");
                None
            }
        }
    }

    fn decode_at<C: DeserializeOwned>(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<C, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked below against the injected clock
        validation.validate_exp = false;
        validation.leeway = 0;

        let data =
            decode::<Envelope<C>>(token, &self.decoding, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed,
                }
            })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::models::session::Session;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret")
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = codec();
        let now = Utc::now();
        let token = codec
            .issue_at(&json!({"userId": "42"}), Duration::hours(1), now)
            .unwrap();

        let claims: serde_json::Value = codec.verify_at(&token, now).unwrap();
        assert_eq!(claims["userId"], "42");
        assert!(claims.get("iat").is_none());
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = codec()
            .issue(&json!({"userId": "a/b+c"}), Duration::hours(1))
            .unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));
    }

    #[test]
    fn test_session_token_expires_after_ttl() {
        let codec = codec();
        let issued = Utc::now();
        let session = Session::new_at("42", Duration::hours(1), issued).unwrap();
        let token = codec.issue_at(&session, Duration::hours(1), issued).unwrap();

        let verified: Session = codec.verify_at(&token, issued).unwrap();
        assert_eq!(verified.user_id, "42");

        let later = issued + Duration::minutes(61);
        assert!(codec.verify_at::<Session>(&token, later).is_none());
    }

    #[test]
    fn test_overflowing_ttl_is_error() {
        let codec = codec();
        let now = Utc::now();
        assert!(codec.issue_at(&json!({"userId": "1"}), Duration::MAX, now).is_err());
        assert!(codec
            .issue_at(&json!({"userId": "1"}), Duration::days(i32::MAX as i64), now)
            .is_err());
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let codec = codec();
        let issued = Utc::now();
        let token = codec
            .issue_at(&json!({"userId": "1"}), Duration::minutes(5), issued)
            .unwrap();

        let just_before = issued + Duration::minutes(5) - Duration::seconds(1);
        assert!(codec.verify_at::<serde_json::Value>(&token, just_before).is_some());
        assert_eq!(
            codec
                .decode_at::<serde_json::Value>(&token, issued + Duration::minutes(5))
                .unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_flipped_signature_byte_fails() {
        let codec = codec();
        let token = codec.issue(&json!({"userId": "42"}), Duration::hours(1)).unwrap();

        let (signed, signature) = token.rsplit_once('.').unwrap();
        let mut bytes = signature.as_bytes().to_vec();
        bytes[0] = if bytes[0] == b'A' { b'B' } else { b'A' };
        let tampered = format!("{}.{}", signed, String::from_utf8(bytes).unwrap());

        assert!(codec.verify::<serde_json::Value>(&tampered).is_none());
        assert_eq!(
            codec
                .decode_at::<serde_json::Value>(&tampered, Utc::now())
                .unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_wrong_secret_fails() {
        let token = codec().issue(&json!({"userId": "42"}), Duration::hours(1)).unwrap();
        let other = TokenCodec::new("another-secret");
        assert!(other.verify::<serde_json::Value>(&token).is_none());
    }

    #[test]
    fn test_malformed_tokens_fail() {
        let codec = codec();
        for token in ["", "not-a-token", "a.b", "a.b.c", "...."] {
            assert_eq!(
                codec
                    .decode_at::<serde_json::Value>(token, Utc::now())
                    .unwrap_err(),
                TokenError::Malformed,
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_claims_shape_mismatch_fails() {
        let codec = codec();
        let token = codec.issue(&json!({"unrelated": true}), Duration::hours(1)).unwrap();
        assert!(codec.verify::<Session>(&token).is_none());
    }

    #[test]
    fn test_fallback_secret_verifies_own_tokens() {
        let codec = TokenCodec::from_secret(None);
        let token = codec.issue(&json!({"userId": "7"}), Duration::hours(1)).unwrap();
        assert!(TokenCodec::new(DEFAULT_SESSION_SECRET)
            .verify::<serde_json::Value>(&token)
            .is_some());
    }
}
