// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Turn allowance: one row per (wallet, player) per rolling 24-hour window.
//!
//! Reads auto-create a fresh window row; updates never do. Callers pass
//! "now" in so the window boundary is computed once per request.

use chrono::{DateTime, Duration, Utc};
use redb::{ReadableTable, WriteTransaction};

use super::{LedgerError, LedgerResult};
use crate::storage::db::{self, PLAYERS, TURNS, TURN_KEY_IDX};
use crate::storage::{EconomyDb, StoredPlayer, StoredTurn};

/// Daily turn allowance by player tier. Unknown tiers get the 2-star limit.
pub fn turn_limit_for_star(star_number: u8) -> u32 {
    match star_number {
        1 => 4,
        2 => 5,
        3 => 7,
        4 => 10,
        5 => 14,
        _ => 5,
    }
}

/// Newest turn row for (wallet, player) whose creation time falls inside
/// the rolling 24-hour window ending at `now`.
fn find_active_turn(
    txn: &WriteTransaction,
    wallet_id: &str,
    player_id: u64,
    now: DateTime<Utc>,
) -> LedgerResult<Option<StoredTurn>> {
    let window_start = now - Duration::hours(24);

    let idx_table = txn.open_table(TURN_KEY_IDX)?;
    let rows_table = txn.open_table(TURNS)?;

    let prefix = db::turn_prefix(wallet_id, player_id);
    let prefix_end = db::turn_prefix_end(wallet_id, player_id);

    for entry in idx_table.range(prefix.as_slice()..prefix_end.as_slice())?.rev() {
        let entry = entry?;
        let Some(value) = rows_table.get(entry.1.value())? else {
            continue;
        };
        let turn: StoredTurn = db::decode_row(value.value())?;
        if turn.created_at >= window_start && turn.created_at <= now {
            return Ok(Some(turn));
        }
        // rows scan newest-first; anything older is out of the window too
        if turn.created_at < window_start {
            break;
        }
    }
    Ok(None)
}

impl EconomyDb {
    /// Return the active-window turn row, creating a zeroed one (limit from
    /// the player's tier) when the window has no row yet.
    ///
    /// Two calls inside the same window return the same row.
    pub fn get_or_init_turn(
        &self,
        wallet_id: &str,
        player_id: u64,
        now: DateTime<Utc>,
    ) -> LedgerResult<StoredTurn> {
        let txn = self.begin_write()?;
        let turn = match find_active_turn(&txn, wallet_id, player_id, now)? {
            Some(turn) => turn,
            None => {
                let star_number = {
                    let players_table = txn.open_table(PLAYERS)?;
                    let star_number = players_table
                        .get(player_id)?
                        .map(|guard| db::decode_row::<StoredPlayer>(guard.value()))
                        .transpose()?
                        .map(|player| player.star_number)
                        .unwrap_or(0);
                    star_number
                };

                let id = db::next_id(&txn, "turns")?;
                let turn = StoredTurn {
                    id,
                    wallet_id: wallet_id.to_string(),
                    player_id,
                    turn_number: 0,
                    turn_limit: turn_limit_for_star(star_number),
                    created_at: now,
                    updated_at: now,
                };

                let mut rows_table = txn.open_table(TURNS)?;
                rows_table.insert(id, db::encode_row(&turn)?.as_slice())?;
                let mut idx_table = txn.open_table(TURN_KEY_IDX)?;
                idx_table.insert(db::turn_index_key(wallet_id, player_id, id).as_slice(), id)?;
                turn
            }
        };
        txn.commit()?;

        Ok(turn)
    }

    /// Set the consumed turn count on the active-window row.
    ///
    /// Fails as a business rule when no row exists for the window (updates
    /// never auto-create) or when the count would exceed the row's limit.
    pub fn update_turn(
        &self,
        wallet_id: &str,
        player_id: u64,
        turn_number: u32,
        now: DateTime<Utc>,
    ) -> LedgerResult<StoredTurn> {
        let txn = self.begin_write()?;
        let turn = {
            let Some(mut turn) = find_active_turn(&txn, wallet_id, player_id, now)? else {
                return Err(LedgerError::BusinessRule(
                    "no turn record exists for the current window".to_string(),
                ));
            };
            if turn_number > turn.turn_limit {
                return Err(LedgerError::BusinessRule(format!(
                    "turn number {turn_number} exceeds the limit of {}",
                    turn.turn_limit
                )));
            }

            turn.turn_number = turn_number;
            turn.updated_at = now;
            let mut rows_table = txn.open_table(TURNS)?;
            rows_table.insert(turn.id, db::encode_row(&turn)?.as_slice())?;
            turn
        };
        txn.commit()?;

        Ok(turn)
    }
}
