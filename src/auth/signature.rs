// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet-signature verification for the login challenge.
//!
//! The client signs the one-time nonce challenge with `personal_sign`
//! (EIP-191); we recover the signing address from the signature and compare
//! it to the claimed public address. Address comparison happens on parsed
//! addresses, so casing never matters.

use std::str::FromStr;

use alloy::primitives::{Address, Signature};

use super::AuthError;

/// The exact challenge text a wallet must sign for login.
pub fn challenge_message(nonce: u64) -> String {
    format!("I am signing my one-time nonce: {nonce}")
}

/// Recover the address that signed `message` with `personal_sign`.
pub fn recover_signer(message: &str, signature_hex: &str) -> Result<Address, AuthError> {
    let signature = Signature::from_str(signature_hex)
        .map_err(|err| AuthError::InvalidSignature(format!("malformed signature: {err}")))?;
    signature
        .recover_address_from_msg(message.as_bytes())
        .map_err(|err| AuthError::InvalidSignature(format!("recovery failed: {err}")))
}

/// Verify that `signature_hex` is `public_address`'s signature over the
/// challenge for `nonce`.
pub fn verify_login_signature(
    public_address: &str,
    nonce: u64,
    signature_hex: &str,
) -> Result<(), AuthError> {
    let claimed = Address::from_str(public_address).map_err(|err| {
        AuthError::InvalidSignature(format!("malformed public address: {err}"))
    })?;

    let recovered = recover_signer(&challenge_message(nonce), signature_hex)?;
    if recovered == claimed {
        Ok(())
    } else {
        Err(AuthError::InvalidSignature(
            "Signature verification failed".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    #[test]
    fn challenge_embeds_the_nonce_verbatim() {
        assert_eq!(
            challenge_message(1234),
            "I am signing my one-time nonce: 1234"
        );
    }

    #[test]
    fn recovers_the_signing_address() {
        let signer = PrivateKeySigner::random();
        let message = challenge_message(77);
        let signature = signer.sign_message_sync(message.as_bytes()).unwrap();

        let recovered =
            recover_signer(&message, &alloy::hex::encode(signature.as_bytes())).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn verify_accepts_any_address_casing() {
        let signer = PrivateKeySigner::random();
        let signature = signer
            .sign_message_sync(challenge_message(42).as_bytes())
            .unwrap();
        let sig_hex = alloy::hex::encode(signature.as_bytes());

        let lower = format!("{:?}", signer.address()).to_lowercase();
        let upper = lower.to_uppercase().replace("0X", "0x");

        verify_login_signature(&lower, 42, &sig_hex).unwrap();
        verify_login_signature(&upper, 42, &sig_hex).unwrap();
    }

    #[test]
    fn signature_over_the_wrong_nonce_is_rejected() {
        let signer = PrivateKeySigner::random();
        let signature = signer
            .sign_message_sync(challenge_message(1).as_bytes())
            .unwrap();
        let sig_hex = alloy::hex::encode(signature.as_bytes());
        let address = format!("{:?}", signer.address());

        let err = verify_login_signature(&address, 2, &sig_hex).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature(_)));
    }

    #[test]
    fn another_wallets_signature_is_rejected() {
        let signer = PrivateKeySigner::random();
        let other = PrivateKeySigner::random();
        let signature = signer
            .sign_message_sync(challenge_message(5).as_bytes())
            .unwrap();
        let sig_hex = alloy::hex::encode(signature.as_bytes());

        let err =
            verify_login_signature(&format!("{:?}", other.address()), 5, &sig_hex).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature(_)));
    }

    #[test]
    fn garbage_signatures_are_malformed_not_panics() {
        let err = verify_login_signature(
            "0x742d35cc6634c0532925a3b844bc9e7595f4ab12",
            1,
            "0xdeadbeef",
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature(_)));
    }
}
