// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance (HS256 JWT).
//!
//! A token is only issued after the login nonce has been rotated and
//! persisted; the claims embed the user id and public address so callers
//! can identify the session without another lookup.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// User id.
    pub sub: u64,
    /// Lowercased wallet public address.
    pub public_address: String,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
}

/// Issue a session token for a logged-in user.
pub fn issue_token(
    user_id: u64,
    public_address: &str,
    secret: &str,
    expires_in_secs: i64,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user_id,
        public_address: public_address.to_lowercase(),
        iat: now,
        exp: now + expires_in_secs,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::from)
}

/// Decode and validate a session token.
pub fn decode_token(token: &str, secret: &str) -> Result<SessionClaims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(AuthError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_tokens_round_trip() {
        let token = issue_token(7, "0xAbC", SECRET, 3600).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.public_address, "0xabc");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn the_wrong_secret_is_rejected() {
        let token = issue_token(7, "0xabc", SECRET, 3600).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        // expired an hour ago (validation leeway is 60s by default)
        let token = issue_token(7, "0xabc", SECRET, -3600).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }
}
