// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Play-history endpoints: session recording, the top-reward leaderboard
//! and the per-day wallet summary.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::PageQuery,
    error::ApiError,
    ledger::{DailyHistory, TopRewardEntry},
    models::WalletAddress,
    state::AppState,
    storage::{StoredHistory, StoredPlayer},
};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to record a play session.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHistoryRequest {
    pub player_id: u64,
    pub wallet_id: WalletAddress,
    pub reward_number: f64,
    pub exp_number: f64,
    pub reward_type: String,
    /// Play mode, e.g. "PVP" or "PVE".
    pub activity_name: String,
}

/// History creation response.
///
/// `player_updated` is false when the exp bonus was skipped because the
/// player row was missing; the history row and reward credit still landed.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHistoryResponse {
    pub history: StoredHistory,
    pub player_updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Query parameters for the top-reward leaderboard.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TopRewardQuery {
    /// Window start date (UTC); defaults to today.
    pub start: Option<NaiveDate>,
    /// Window end date (UTC, inclusive); defaults to today.
    pub end: Option<NaiveDate>,
    /// Optional activity filter; also pins the reward type to "SCORE".
    pub activity_name: Option<String>,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopRewardRow {
    pub player_id: u64,
    pub total_reward: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<StoredPlayer>,
}

impl From<TopRewardEntry> for TopRewardRow {
    fn from(entry: TopRewardEntry) -> Self {
        Self {
            player_id: entry.player_id,
            total_reward: entry.total_reward,
            player: entry.player,
        }
    }
}

/// Query parameters for the per-day summary.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DailyHistoryQuery {
    /// First day of the two-day window (UTC); defaults to today.
    pub start_date: Option<NaiveDate>,
}

/// One calendar day of a wallet's play history.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyHistoryResponse {
    pub date: NaiveDate,
    pub total_exp: f64,
    pub total_reward: f64,
    pub entries: Vec<StoredHistory>,
}

impl From<DailyHistory> for DailyHistoryResponse {
    fn from(day: DailyHistory) -> Self {
        Self {
            date: day.date,
            total_exp: day.total_exp,
            total_reward: day.total_reward,
            entries: day.entries,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Record a play session: history row, reward credit and player exp bonus.
#[utoipa::path(
    post,
    path = "/v1/play-history",
    tag = "Play History",
    request_body = CreateHistoryRequest,
    responses(
        (status = 200, description = "Session recorded", body = CreateHistoryResponse),
    )
)]
pub async fn create_history(
    State(state): State<AppState>,
    Json(request): Json<CreateHistoryRequest>,
) -> Result<Json<CreateHistoryResponse>, ApiError> {
    let outcome = state.db.create_history(
        request.player_id,
        request.wallet_id.as_str(),
        request.reward_number,
        request.exp_number,
        &request.reward_type,
        &request.activity_name,
    )?;

    let message = (!outcome.player_updated)
        .then(|| "player does not exist; exp bonus skipped".to_string());
    Ok(Json(CreateHistoryResponse {
        history: outcome.history,
        player_updated: outcome.player_updated,
        message,
    }))
}

/// List a wallet's play history, newest first.
#[utoipa::path(
    get,
    path = "/v1/play-history/{wallet_id}",
    tag = "Play History",
    params(
        ("wallet_id" = String, Path, description = "Wallet id"),
        PageQuery,
    ),
    responses(
        (status = 200, description = "History rows", body = [StoredHistory]),
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<StoredHistory>>, ApiError> {
    let rows = state.db.list_history(&wallet_id, page.skip(), page.limit())?;
    Ok(Json(rows))
}

/// Top-reward leaderboard over a date window.
#[utoipa::path(
    get,
    path = "/v1/play-history/top-rewards",
    tag = "Play History",
    params(TopRewardQuery),
    responses(
        (status = 200, description = "Leaderboard, descending", body = [TopRewardRow]),
    )
)]
pub async fn top_rewards(
    State(state): State<AppState>,
    Query(query): Query<TopRewardQuery>,
) -> Result<Json<Vec<TopRewardRow>>, ApiError> {
    let today = Utc::now().date_naive();
    let start = query.start.unwrap_or(today);
    let end = query.end.unwrap_or(today);

    let board = state
        .db
        .top_rewards(start, end, query.activity_name.as_deref())?;
    Ok(Json(board.into_iter().map(TopRewardRow::from).collect()))
}

/// A wallet's history grouped by UTC calendar day over a two-day window.
#[utoipa::path(
    get,
    path = "/v1/play-history/{wallet_id}/daily",
    tag = "Play History",
    params(
        ("wallet_id" = String, Path, description = "Wallet id"),
        DailyHistoryQuery,
    ),
    responses(
        (status = 200, description = "Per-day summaries", body = [DailyHistoryResponse]),
    )
)]
pub async fn daily_history(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Query(query): Query<DailyHistoryQuery>,
) -> Result<Json<Vec<DailyHistoryResponse>>, ApiError> {
    let start = query.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let days = state.db.history_by_wallet(&wallet_id, start)?;
    Ok(Json(
        days.into_iter().map(DailyHistoryResponse::from).collect(),
    ))
}
