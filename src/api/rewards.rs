// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reward ledger read endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::ApiError, state::AppState, storage::StoredReward};

/// List every reward ledger of a wallet.
///
/// A reward type with no row is a zero balance.
#[utoipa::path(
    get,
    path = "/v1/rewards/{wallet_id}",
    tag = "Rewards",
    params(("wallet_id" = String, Path, description = "Wallet id")),
    responses(
        (status = 200, description = "Ledger rows", body = [StoredReward]),
    )
)]
pub async fn list_rewards(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<Vec<StoredReward>>, ApiError> {
    let rewards = state.db.list_rewards(&wallet_id)?;
    Ok(Json(rewards))
}
