// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claim endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    api::PageQuery,
    error::ApiError,
    models::WalletAddress,
    state::AppState,
    storage::{ClaimStatus, StoredClaim},
};

/// Request to record a payout claim.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    pub wallet_id: WalletAddress,
    pub claim_reward_amount: f64,
    pub claim_reward_type: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Request to update an existing claim (settlement tooling).
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClaimRequest {
    pub wallet_id: WalletAddress,
    pub claim_reward_amount: f64,
    pub claim_reward_type: String,
    pub claim_status: ClaimStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Record a claim and credit the net-of-fee amount to the ledger.
#[utoipa::path(
    post,
    path = "/v1/claims",
    tag = "Claims",
    request_body = CreateClaimRequest,
    responses(
        (status = 200, description = "Claim recorded and credited", body = StoredClaim),
        (status = 422, description = "Invalid amount"),
    )
)]
pub async fn create_claim(
    State(state): State<AppState>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<Json<StoredClaim>, ApiError> {
    let claim = state.db.create_claim(
        request.wallet_id.as_str(),
        request.claim_reward_amount,
        &request.claim_reward_type,
        request.transaction_id,
        state.config.claim_fee_percent,
    )?;
    Ok(Json(claim))
}

/// Replace the fields of an existing claim.
#[utoipa::path(
    put,
    path = "/v1/claims/{claim_id}",
    tag = "Claims",
    params(("claim_id" = u64, Path, description = "Claim id")),
    request_body = UpdateClaimRequest,
    responses(
        (status = 200, description = "Claim updated", body = StoredClaim),
        (status = 404, description = "No such claim"),
    )
)]
pub async fn update_claim(
    State(state): State<AppState>,
    Path(claim_id): Path<u64>,
    Json(request): Json<UpdateClaimRequest>,
) -> Result<Json<StoredClaim>, ApiError> {
    let claim = state.db.update_claim(
        claim_id,
        request.wallet_id.as_str(),
        request.claim_reward_amount,
        &request.claim_reward_type,
        request.claim_status,
        request.transaction_id,
    )?;
    Ok(Json(claim))
}

/// List a wallet's claims, newest first.
#[utoipa::path(
    get,
    path = "/v1/claims/{wallet_id}",
    tag = "Claims",
    params(
        ("wallet_id" = String, Path, description = "Wallet id"),
        PageQuery,
    ),
    responses(
        (status = 200, description = "Claims", body = [StoredClaim]),
    )
)]
pub async fn list_claims(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<StoredClaim>>, ApiError> {
    let claims = state.db.list_claims(&wallet_id, page.skip(), page.limit())?;
    Ok(Json(claims))
}
