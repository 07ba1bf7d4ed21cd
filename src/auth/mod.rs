// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Nonce-based wallet-signature login.
//!
//! ## Auth Flow
//!
//! 1. Client registers (or checks) its public address and receives the
//!    current nonce.
//! 2. Client signs `"I am signing my one-time nonce: {nonce}"` with
//!    `personal_sign` and posts address + signature to login.
//! 3. Server recovers the signer address from the signature and compares it
//!    to the claimed address.
//! 4. On match the nonce is rotated and persisted *first*, then an HS256
//!    session token is issued. A used challenge can never be replayed.

pub mod signature;
pub mod token;

pub use signature::{challenge_message, recover_signer, verify_login_signature};
pub use token::{decode_token, issue_token, SessionClaims};

use ring::rand::{SecureRandom, SystemRandom};

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Signature missing, malformed or signed by another wallet.
    #[error("{0}")]
    InvalidSignature(String),

    /// Token issuance or validation failed.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// The system RNG refused to produce bytes.
    #[error("nonce generation failed")]
    Rng,
}

/// Range of login nonces: [0, 10000).
const NONCE_RANGE: u64 = 10_000;

/// Draw a fresh login nonce from the system RNG.
pub fn fresh_nonce() -> Result<u64, AuthError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 8];
    rng.fill(&mut bytes).map_err(|_| AuthError::Rng)?;
    Ok(u64::from_be_bytes(bytes) % NONCE_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonces_stay_in_range() {
        for _ in 0..200 {
            assert!(fresh_nonce().unwrap() < NONCE_RANGE);
        }
    }

    #[test]
    fn nonces_vary() {
        let first = fresh_nonce().unwrap();
        let distinct = (0..50).any(|_| fresh_nonce().unwrap() != first);
        assert!(distinct, "50 identical nonces in a row is not randomness");
    }
}
