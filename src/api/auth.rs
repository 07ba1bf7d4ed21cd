// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth endpoints: register, nonce check and wallet-signature login.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth,
    error::ApiError,
    models::WalletAddress,
    state::AppState,
    storage::StoredUser,
};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to register a new wallet identity.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Wallet public address (0x + 40 hex chars).
    pub public_address: WalletAddress,
    /// Game wallet id owned by this address.
    pub wallet_id: WalletAddress,
}

/// Response wrapping a user record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: StoredUser,
}

/// Request to log in with a signed nonce challenge.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub public_address: WalletAddress,
    /// Hex `personal_sign` signature over the nonce challenge.
    pub signature: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

/// Query parameters for the existence check.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CheckQuery {
    pub public_address: String,
}

/// Existence check response; `user` carries the current nonce for challenge
/// construction.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<StoredUser>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new wallet identity.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 409, description = "publicAddress already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let nonce = auth::fresh_nonce()?;
    let user = state.db.register_user(
        request.public_address.as_str(),
        request.wallet_id.as_str(),
        nonce,
    )?;
    Ok(Json(UserResponse { user }))
}

/// Log in by proving ownership of the wallet's private key.
///
/// The signature must cover `"I am signing my one-time nonce: {nonce}"` for
/// the user's current nonce. On success the nonce is rotated *before* the
/// session token is issued, so the challenge cannot be replayed.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 401, description = "Unknown wallet or failed signature verification"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let address = request.public_address.as_str();
    let user = state.db.find_user_by_address(address)?.ok_or_else(|| {
        ApiError::unauthorized(format!(
            "User with publicAddress {} is not found in database",
            address.to_lowercase()
        ))
    })?;

    auth::verify_login_signature(address, user.nonce, &request.signature)?;

    // Rotate the nonce first; if the save fails no token is issued.
    let next_nonce = auth::fresh_nonce()?;
    state.db.rotate_nonce(user.id, next_nonce)?;

    let access_token = auth::issue_token(
        user.id,
        &user.public_address,
        &state.config.jwt_secret,
        state.config.jwt_expires_in,
    )?;
    Ok(Json(LoginResponse { access_token }))
}

/// Check whether a public address is registered and fetch its record.
#[utoipa::path(
    get,
    path = "/v1/auth/check",
    tag = "Auth",
    params(CheckQuery),
    responses(
        (status = 200, description = "Existence and current record", body = CheckResponse),
    )
)]
pub async fn check(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<CheckResponse>, ApiError> {
    let user = state.db.find_user_by_address(&query.public_address)?;
    Ok(Json(CheckResponse {
        exists: user.is_some(),
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::EconomyDb;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    fn test_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = EconomyDb::open(&dir.path().join("economy.redb")).expect("open db");
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in: 3600,
            withdraw_fee_percent: 5.0,
            claim_fee_percent: 5.0,
        };
        (dir, AppState::new(db, config))
    }

    fn sign_current_nonce(state: &AppState, signer: &PrivateKeySigner, address: &str) -> String {
        let user = state
            .db
            .find_user_by_address(address)
            .unwrap()
            .expect("registered");
        let signature = signer
            .sign_message_sync(auth::challenge_message(user.nonce).as_bytes())
            .unwrap();
        alloy::hex::encode(signature.as_bytes())
    }

    #[tokio::test]
    async fn full_login_round_trip_rotates_the_nonce() {
        let (_dir, state) = test_state();
        let signer = PrivateKeySigner::random();
        let address = format!("{:?}", signer.address());

        register(
            State(state.clone()),
            Json(RegisterRequest {
                public_address: address.as_str().into(),
                wallet_id: "wallet-1".into(),
            }),
        )
        .await
        .unwrap();

        let signature = sign_current_nonce(&state, &signer, &address);
        let response = login(
            State(state.clone()),
            Json(LoginRequest {
                public_address: address.as_str().into(),
                signature: signature.clone(),
            }),
        )
        .await
        .unwrap();

        let claims =
            auth::decode_token(&response.0.access_token, &state.config.jwt_secret).unwrap();
        assert_eq!(claims.public_address, address.to_lowercase());

        // replaying the consumed challenge against the rotated nonce fails
        let err = login(
            State(state.clone()),
            Json(LoginRequest {
                public_address: address.as_str().into(),
                signature,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);

        // signing the fresh nonce works again
        let second_signature = sign_current_nonce(&state, &signer, &address);
        login(
            State(state),
            Json(LoginRequest {
                public_address: address.as_str().into(),
                signature: second_signature,
            }),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn login_for_unknown_wallet_is_unauthorized() {
        let (_dir, state) = test_state();
        let err = login(
            State(state),
            Json(LoginRequest {
                public_address: "0x742d35cc6634c0532925a3b844bc9e7595f4ab12".into(),
                signature: "0x00".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_wallets_signature_does_not_rotate_the_nonce() {
        let (_dir, state) = test_state();
        let signer = PrivateKeySigner::random();
        let imposter = PrivateKeySigner::random();
        let address = format!("{:?}", signer.address());

        register(
            State(state.clone()),
            Json(RegisterRequest {
                public_address: address.as_str().into(),
                wallet_id: "wallet-1".into(),
            }),
        )
        .await
        .unwrap();
        let nonce_before = state
            .db
            .find_user_by_address(&address)
            .unwrap()
            .unwrap()
            .nonce;

        let signature = imposter
            .sign_message_sync(auth::challenge_message(nonce_before).as_bytes())
            .unwrap();
        let err = login(
            State(state.clone()),
            Json(LoginRequest {
                public_address: address.as_str().into(),
                signature: alloy::hex::encode(signature.as_bytes()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);

        let nonce_after = state
            .db
            .find_user_by_address(&address)
            .unwrap()
            .unwrap()
            .nonce;
        assert_eq!(nonce_after, nonce_before, "failed login must not mutate");
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let (_dir, state) = test_state();
        let request = RegisterRequest {
            public_address: "0xAbC123".into(),
            wallet_id: "wallet-1".into(),
        };

        register(State(state.clone()), Json(request.clone()))
            .await
            .unwrap();
        let err = register(State(state), Json(request)).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn check_reports_existence_without_mutating() {
        let (_dir, state) = test_state();
        register(
            State(state.clone()),
            Json(RegisterRequest {
                public_address: "0xabc".into(),
                wallet_id: "wallet-1".into(),
            }),
        )
        .await
        .unwrap();

        let found = check(
            State(state.clone()),
            Query(CheckQuery {
                public_address: "0xABC".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(found.0.exists);
        let nonce_one = found.0.user.as_ref().unwrap().nonce;

        let again = check(
            State(state.clone()),
            Query(CheckQuery {
                public_address: "0xabc".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(again.0.user.unwrap().nonce, nonce_one);

        let missing = check(
            State(state),
            Query(CheckQuery {
                public_address: "0xnope".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(!missing.0.exists);
    }
}
