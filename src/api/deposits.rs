// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deposit endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    api::PageQuery, error::ApiError, models::WalletAddress, state::AppState,
    storage::StoredDeposit,
};

/// Request to record a deposit.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepositRequest {
    pub wallet_id: WalletAddress,
    pub token_balance: f64,
    /// Reward type credited, e.g. "TOC".
    pub token_type: String,
}

/// Record a deposit and credit the wallet's reward ledger.
#[utoipa::path(
    post,
    path = "/v1/deposit",
    tag = "Deposits",
    request_body = CreateDepositRequest,
    responses(
        (status = 200, description = "Deposit recorded and credited", body = StoredDeposit),
        (status = 422, description = "Invalid amount"),
    )
)]
pub async fn create_deposit(
    State(state): State<AppState>,
    Json(request): Json<CreateDepositRequest>,
) -> Result<Json<StoredDeposit>, ApiError> {
    let deposit = state.db.create_deposit(
        request.wallet_id.as_str(),
        request.token_balance,
        &request.token_type,
    )?;
    Ok(Json(deposit))
}

/// List a wallet's deposits, newest first.
#[utoipa::path(
    get,
    path = "/v1/deposit/{wallet_id}",
    tag = "Deposits",
    params(
        ("wallet_id" = String, Path, description = "Wallet id"),
        PageQuery,
    ),
    responses(
        (status = 200, description = "Deposits", body = [StoredDeposit]),
    )
)]
pub async fn list_deposits(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<StoredDeposit>>, ApiError> {
    let deposits = state
        .db
        .list_deposits(&wallet_id, page.skip(), page.limit())?;
    Ok(Json(deposits))
}
