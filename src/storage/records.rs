// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stored row types for the economy database.
//!
//! Every entity is persisted as a JSON-encoded row under an auto-increment
//! `u64` id (see [`super::db`] for the table layout). Field names are
//! camelCased on the wire so API responses can return rows directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registered wallet identity.
///
/// `public_address` is stored lowercased and is unique across users. The
/// nonce is regenerated on every successful login so a captured signature
/// cannot be replayed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: u64,
    pub public_address: String,
    pub nonce: u64,
    pub wallet_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A game character owned by a wallet.
///
/// One wallet may own several players, distinguished by `token_id`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredPlayer {
    pub id: u64,
    pub wallet_id: String,
    /// Tier, 1-5. Drives the turn-limit and mana lookup tables.
    pub star_number: u8,
    pub mana: i64,
    pub hp: i64,
    pub total_exp: f64,
    pub skin_name: String,
    pub token_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The reward ledger row: one per (wallet, reward type).
///
/// `reward_amount == reward_available + reward_withdrawn` is recomputed on
/// every write; a missing row reads as an all-zero baseline.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredReward {
    pub id: u64,
    pub wallet_id: String,
    /// Currency/category tag, e.g. "TOC", "SNCT", "SCORE".
    pub reward_type: String,
    pub reward_amount: f64,
    pub reward_available: f64,
    pub reward_withdrawn: f64,
    pub total_exp: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Settlement status shared by deposit and withdrawal event rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum TransferStatus {
    Fail,
    Pending,
    Success,
}

/// Append-only deposit event. A committed deposit has credited the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredDeposit {
    pub id: u64,
    pub wallet_id: String,
    pub token_balance: f64,
    pub token_type: String,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only withdrawal event.
///
/// Rows are written even when the withdrawal is rejected for insufficient
/// balance (status stays `Fail`); accepted rows are `Pending` until settled
/// outside this service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredWithdrawal {
    pub id: u64,
    pub wallet_id: String,
    pub token_balance: f64,
    pub token_type: String,
    pub status: TransferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Claim settlement status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum ClaimStatus {
    Submitted,
    Success,
    Failed,
}

/// Append-only claim event recording an off-system payout claim.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredClaim {
    pub id: u64,
    pub wallet_id: String,
    pub claim_reward_amount: f64,
    pub claim_reward_type: String,
    pub claim_status: ClaimStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only play-session record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredHistory {
    pub id: u64,
    pub player_id: u64,
    pub wallet_id: String,
    pub reward_number: f64,
    pub exp_number: f64,
    pub reward_type: String,
    /// Play mode, e.g. "PVP" or "PVE".
    pub activity_name: String,
    pub created_at: DateTime<Utc>,
}

/// Daily action allowance for one (wallet, player) pair.
///
/// A row is valid for a rolling 24-hour window starting at `created_at`;
/// the first request of a new window seeds a fresh row at zero.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredTurn {
    pub id: u64,
    pub wallet_id: String,
    pub player_id: u64,
    pub turn_number: u32,
    pub turn_limit: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
