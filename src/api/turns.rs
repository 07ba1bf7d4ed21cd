// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Turn allowance endpoints.
//!
//! "Now" is read once per request and passed down so the rolling-24h window
//! boundary cannot skew inside a slow request.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState, storage::StoredTurn};

/// Request to set the consumed turn count.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTurnRequest {
    pub turn_number: u32,
}

/// Fetch the active-window turn row, creating a zeroed one when the window
/// is fresh.
#[utoipa::path(
    get,
    path = "/v1/turns/{wallet_id}/{player_id}",
    tag = "Turns",
    params(
        ("wallet_id" = String, Path, description = "Wallet id"),
        ("player_id" = u64, Path, description = "Player id"),
    ),
    responses(
        (status = 200, description = "Active-window turn row", body = StoredTurn),
    )
)]
pub async fn get_turn(
    State(state): State<AppState>,
    Path((wallet_id, player_id)): Path<(String, u64)>,
) -> Result<Json<StoredTurn>, ApiError> {
    let turn = state.db.get_or_init_turn(&wallet_id, player_id, Utc::now())?;
    Ok(Json(turn))
}

/// Set the consumed turn count on the active-window row.
#[utoipa::path(
    put,
    path = "/v1/turns/{wallet_id}/{player_id}",
    tag = "Turns",
    params(
        ("wallet_id" = String, Path, description = "Wallet id"),
        ("player_id" = u64, Path, description = "Player id"),
    ),
    request_body = UpdateTurnRequest,
    responses(
        (status = 200, description = "Turn row updated", body = StoredTurn),
        (status = 422, description = "No active-window row, or count exceeds the limit"),
    )
)]
pub async fn update_turn(
    State(state): State<AppState>,
    Path((wallet_id, player_id)): Path<(String, u64)>,
    Json(request): Json<UpdateTurnRequest>,
) -> Result<Json<StoredTurn>, ApiError> {
    let turn = state
        .db
        .update_turn(&wallet_id, player_id, request.turn_number, Utc::now())?;
    Ok(Json(turn))
}
