// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Player records and the player-facing ledger flows: the atomic mana
//! refill (TOC-funded) and the SNCT-funded character roll.
//!
//! The mana refill is the strictest flow in the ledger: the TOC debit and
//! the player's new mana value commit or roll back together.

use chrono::Utc;
use redb::ReadableTable;
use tracing::info;

use super::{apply_reward_delta, LedgerError, LedgerResult, RewardDelta};
use crate::storage::db::{self, PLAYERS};
use crate::storage::{EconomyDb, StoredPlayer};

/// Reward type charged for mana refills.
const MANA_REWARD_TYPE: &str = "TOC";

/// Reward type and price of one character roll.
const ROLL_REWARD_TYPE: &str = "SNCT";
const ROLL_COST: f64 = 1000.0;

/// Mana capacity by player tier. Unknown tiers have no mana pool.
pub fn mana_for_star(star_number: u8) -> i64 {
    match star_number {
        1 => 100,
        2 => 125,
        3 => 175,
        4 => 250,
        5 => 350,
        _ => 0,
    }
}

/// TOC cost of a full refill by tier.
fn full_refill_cost(star_number: u8) -> f64 {
    match star_number {
        1 => 30.0,
        2 => 37.5,
        3 => 52.5,
        4 => 75.0,
        5 => 105.0,
        _ => 0.0,
    }
}

/// TOC cost of adding `mana_delta` points at the given tier, scaled
/// linearly from the tier's full-refill cost.
pub fn toc_cost_for(star_number: u8, mana_delta: i64) -> f64 {
    let capacity = mana_for_star(star_number);
    if capacity == 0 {
        return 0.0;
    }
    full_refill_cost(star_number) * mana_delta as f64 / capacity as f64
}

/// Map a raw die roll onto a star tier, with the source's skew: a roll of
/// 0 becomes 1 star and a roll of 4 becomes 5 stars.
pub fn pick_star(roll: u8) -> u8 {
    match roll % 5 {
        0 => 1,
        4 => 5,
        other => other,
    }
}

/// Pick a skin name from a raw roll.
pub fn pick_skin(roll: u8) -> &'static str {
    const SKINS: [&str; 3] = ["Apples", "Bananas", "Pears"];
    SKINS[roll as usize % SKINS.len()]
}

/// Outcome of a paid character roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRoll {
    pub star_number: u8,
    pub skin_name: String,
}

impl EconomyDb {
    /// Create a player for a wallet. Resources start at zero.
    pub fn create_player(
        &self,
        wallet_id: &str,
        star_number: u8,
        skin_name: &str,
        token_id: Option<String>,
    ) -> LedgerResult<StoredPlayer> {
        let now = Utc::now();

        let txn = self.begin_write()?;
        let player = {
            let id = db::next_id(&txn, "players")?;
            let player = StoredPlayer {
                id,
                wallet_id: wallet_id.to_string(),
                star_number,
                mana: 0,
                hp: 0,
                total_exp: 0.0,
                skin_name: skin_name.to_string(),
                token_id,
                created_at: now,
                updated_at: now,
            };
            let mut rows_table = txn.open_table(PLAYERS)?;
            rows_table.insert(id, db::encode_row(&player)?.as_slice())?;
            player
        };
        txn.commit()?;

        Ok(player)
    }

    /// Look up a player by id.
    pub fn get_player(&self, player_id: u64) -> LedgerResult<Option<StoredPlayer>> {
        Ok(self.read_one(PLAYERS, player_id)?)
    }

    /// Add hit points to a player.
    pub fn boot_hp(&self, player_id: u64, hp: i64) -> LedgerResult<StoredPlayer> {
        let now = Utc::now();

        let txn = self.begin_write()?;
        let player = {
            let mut rows_table = txn.open_table(PLAYERS)?;
            let mut player: StoredPlayer = rows_table
                .get(player_id)?
                .map(|guard| db::decode_row(guard.value()))
                .transpose()?
                .ok_or_else(|| LedgerError::NotFound("player".to_string()))?;

            player.hp += hp;
            player.updated_at = now;
            rows_table.insert(player_id, db::encode_row(&player)?.as_slice())?;
            player
        };
        txn.commit()?;

        Ok(player)
    }

    /// Refill a player's mana to their tier capacity, charging the wallet's
    /// TOC ledger proportionally to the mana actually added.
    ///
    /// All-or-nothing: an insufficient TOC balance (or any failure) leaves
    /// both the player and the ledger untouched.
    pub fn boot_mana(&self, player_id: u64) -> LedgerResult<StoredPlayer> {
        let now = Utc::now();

        let txn = self.begin_write()?;
        let player = {
            let mut rows_table = txn.open_table(PLAYERS)?;
            let mut player: StoredPlayer = rows_table
                .get(player_id)?
                .map(|guard| db::decode_row(guard.value()))
                .transpose()?
                .ok_or_else(|| LedgerError::NotFound("player".to_string()))?;

            let target = mana_for_star(player.star_number);
            let mana_delta = target - player.mana;
            if mana_delta > 0 {
                let toc_cost = toc_cost_for(player.star_number, mana_delta);
                apply_reward_delta(
                    &txn,
                    &player.wallet_id,
                    MANA_REWARD_TYPE,
                    RewardDelta {
                        available: -toc_cost,
                        ..Default::default()
                    },
                    Some(toc_cost),
                    now,
                )?;

                player.mana = target;
                player.updated_at = now;
                rows_table.insert(player_id, db::encode_row(&player)?.as_slice())?;

                info!(
                    wallet = %player.wallet_id,
                    player = player_id,
                    mana_added = mana_delta,
                    toc_cost,
                    "mana refilled"
                );
            }
            player
        };
        txn.commit()?;

        Ok(player)
    }

    /// Debit the wallet's SNCT ledger for one character roll.
    ///
    /// The rolled tier and skin are drawn by the caller; this flow only
    /// charges for them, rejecting the roll when the balance is short.
    pub fn redeem_player_roll(
        &self,
        wallet_id: &str,
        star_number: u8,
        skin_name: &str,
    ) -> LedgerResult<PlayerRoll> {
        let now = Utc::now();

        let txn = self.begin_write()?;
        apply_reward_delta(
            &txn,
            wallet_id,
            ROLL_REWARD_TYPE,
            RewardDelta {
                available: -ROLL_COST,
                ..Default::default()
            },
            Some(ROLL_COST),
            now,
        )?;
        txn.commit()?;

        info!(wallet = %wallet_id, star = star_number, "player roll redeemed");
        Ok(PlayerRoll {
            star_number,
            skin_name: skin_name.to_string(),
        })
    }
}
