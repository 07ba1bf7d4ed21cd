// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Combined transactions-history endpoint: a wallet's deposits and
//! withdrawals side by side.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::ApiError,
    state::AppState,
    storage::{StoredDeposit, StoredWithdrawal},
};

/// Query parameters for the combined listing.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsHistoryQuery {
    pub wallet_id: String,
    /// Total row limit, split evenly between deposits and withdrawals.
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

/// Combined transactions history for a wallet.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsHistoryResponse {
    pub deposits: Vec<StoredDeposit>,
    pub withdrawals: Vec<StoredWithdrawal>,
}

/// List a wallet's deposits and withdrawals, newest first, half the limit
/// each.
#[utoipa::path(
    get,
    path = "/v1/transactions-history",
    tag = "Transactions",
    params(TransactionsHistoryQuery),
    responses(
        (status = 200, description = "Combined history", body = TransactionsHistoryResponse),
    )
)]
pub async fn transactions_history(
    State(state): State<AppState>,
    Query(query): Query<TransactionsHistoryQuery>,
) -> Result<Json<TransactionsHistoryResponse>, ApiError> {
    let limit = query.limit.unwrap_or(50);
    let skip = query.skip.unwrap_or(0);
    let half = (limit / 2).max(1);

    let deposits = state.db.list_deposits(&query.wallet_id, skip, half)?;
    let withdrawals = state.db.list_withdrawals(&query.wallet_id, skip, half)?;
    Ok(Json(TransactionsHistoryResponse {
        deposits,
        withdrawals,
    }))
}
