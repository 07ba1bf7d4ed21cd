// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Player endpoints: creation, lookup, resource boosts and the paid
//! character roll.

use axum::{
    extract::{Path, State},
    Json,
};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    ledger::{pick_skin, pick_star},
    models::WalletAddress,
    state::AppState,
    storage::StoredPlayer,
};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to create a player.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub wallet_id: WalletAddress,
    /// Tier, 1-5.
    pub star_number: u8,
    pub skin_name: String,
    #[serde(default)]
    pub token_id: Option<String>,
}

/// Request to add hit points.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BootHpRequest {
    pub hp: i64,
}

/// Request for a paid character roll.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RandomPlayerRequest {
    pub wallet_id: WalletAddress,
}

/// Rolled character attributes.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RandomPlayerResponse {
    pub star_number: u8,
    pub skin_name: String,
}

fn roll_byte() -> Result<u8, ApiError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 1];
    rng.fill(&mut bytes)
        .map_err(|_| ApiError::internal("roll generation failed"))?;
    Ok(bytes[0])
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a player. Resources start at zero.
#[utoipa::path(
    post,
    path = "/v1/players",
    tag = "Players",
    request_body = CreatePlayerRequest,
    responses(
        (status = 200, description = "Player created", body = StoredPlayer),
    )
)]
pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<Json<StoredPlayer>, ApiError> {
    let player = state.db.create_player(
        request.wallet_id.as_str(),
        request.star_number,
        &request.skin_name,
        request.token_id,
    )?;
    Ok(Json(player))
}

/// Fetch a player by id.
#[utoipa::path(
    get,
    path = "/v1/players/{player_id}",
    tag = "Players",
    params(("player_id" = u64, Path, description = "Player id")),
    responses(
        (status = 200, description = "Player", body = StoredPlayer),
        (status = 404, description = "No such player"),
    )
)]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<u64>,
) -> Result<Json<StoredPlayer>, ApiError> {
    let player = state
        .db
        .get_player(player_id)?
        .ok_or_else(|| ApiError::not_found("player not found"))?;
    Ok(Json(player))
}

/// Refill a player's mana to tier capacity, charging the wallet's TOC
/// ledger. All-or-nothing.
#[utoipa::path(
    post,
    path = "/v1/players/{player_id}/boot-mana",
    tag = "Players",
    params(("player_id" = u64, Path, description = "Player id")),
    responses(
        (status = 200, description = "Mana refilled", body = StoredPlayer),
        (status = 404, description = "No such player"),
        (status = 422, description = "Insufficient TOC balance"),
    )
)]
pub async fn boot_mana(
    State(state): State<AppState>,
    Path(player_id): Path<u64>,
) -> Result<Json<StoredPlayer>, ApiError> {
    let player = state.db.boot_mana(player_id)?;
    Ok(Json(player))
}

/// Add hit points to a player.
#[utoipa::path(
    post,
    path = "/v1/players/{player_id}/boot-hp",
    tag = "Players",
    params(("player_id" = u64, Path, description = "Player id")),
    request_body = BootHpRequest,
    responses(
        (status = 200, description = "Hit points added", body = StoredPlayer),
        (status = 404, description = "No such player"),
    )
)]
pub async fn boot_hp(
    State(state): State<AppState>,
    Path(player_id): Path<u64>,
    Json(request): Json<BootHpRequest>,
) -> Result<Json<StoredPlayer>, ApiError> {
    let player = state.db.boot_hp(player_id, request.hp)?;
    Ok(Json(player))
}

/// Roll random character attributes, funded by the wallet's SNCT ledger.
#[utoipa::path(
    post,
    path = "/v1/players/random",
    tag = "Players",
    request_body = RandomPlayerRequest,
    responses(
        (status = 200, description = "Rolled attributes", body = RandomPlayerResponse),
        (status = 422, description = "Insufficient SNCT balance"),
    )
)]
pub async fn random_player(
    State(state): State<AppState>,
    Json(request): Json<RandomPlayerRequest>,
) -> Result<Json<RandomPlayerResponse>, ApiError> {
    let star_number = pick_star(roll_byte()?);
    let skin_name = pick_skin(roll_byte()?);

    let roll = state
        .db
        .redeem_player_roll(request.wallet_id.as_str(), star_number, skin_name)?;
    Ok(Json(RandomPlayerResponse {
        star_number: roll.star_number,
        skin_name: roll.skin_name,
    }))
}
