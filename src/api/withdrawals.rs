// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Withdrawal endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    api::PageQuery,
    error::ApiError,
    ledger::WithdrawOutcome,
    models::WalletAddress,
    state::AppState,
    storage::StoredWithdrawal,
};

/// Request to withdraw from a wallet's reward ledger.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWithdrawRequest {
    pub wallet_id: WalletAddress,
    /// Payout amount; the ledger is debited this plus the fee.
    pub token_balance: f64,
    pub token_type: String,
}

/// Request a withdrawal.
///
/// The fee is charged on top of the requested amount. A rejected request
/// still records a `Fail` event row for auditability.
#[utoipa::path(
    post,
    path = "/v1/withdraw",
    tag = "Withdrawals",
    request_body = CreateWithdrawRequest,
    responses(
        (status = 200, description = "Withdrawal accepted, settlement pending", body = StoredWithdrawal),
        (status = 422, description = "Insufficient balance for amount plus fee"),
    )
)]
pub async fn create_withdrawal(
    State(state): State<AppState>,
    Json(request): Json<CreateWithdrawRequest>,
) -> Result<Json<StoredWithdrawal>, ApiError> {
    let outcome = state.db.create_withdrawal(
        request.wallet_id.as_str(),
        request.token_balance,
        &request.token_type,
        state.config.withdraw_fee_percent,
    )?;

    match outcome {
        WithdrawOutcome::Accepted(withdrawal) => Ok(Json(withdrawal)),
        WithdrawOutcome::InsufficientFunds(_) => Err(ApiError::unprocessable(
            "insufficient balance to withdraw this amount",
        )),
    }
}

/// List a wallet's withdrawals, newest first.
#[utoipa::path(
    get,
    path = "/v1/withdraw/{wallet_id}",
    tag = "Withdrawals",
    params(
        ("wallet_id" = String, Path, description = "Wallet id"),
        PageQuery,
    ),
    responses(
        (status = 200, description = "Withdrawals", body = [StoredWithdrawal]),
    )
)]
pub async fn list_withdrawals(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<StoredWithdrawal>>, ApiError> {
    let withdrawals = state
        .db
        .list_withdrawals(&wallet_id, page.skip(), page.limit())?;
    Ok(Json(withdrawals))
}
