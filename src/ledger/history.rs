// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Play-history flow: append a session record, credit the reward ledger and
//! award the player's experience bonus.
//!
//! The experience bonus is best-effort: a missing player does not abort the
//! flow, but the outcome reports it so callers can surface the partial
//! success instead of swallowing it.
//!
//! Also hosts the two history aggregations: the top-reward leaderboard and
//! the per-day summary for a wallet.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use redb::ReadableTable;
use tracing::{info, warn};

use super::{apply_reward_delta, LedgerResult, RewardDelta};
use crate::storage::db::{self, HISTORY, HISTORY_WALLET_IDX, PLAYERS};
use crate::storage::{EconomyDb, StoredHistory, StoredPlayer};

/// Result of history creation. `player_updated` is false when the player
/// row was missing (or owned by another wallet) and the exp bonus was
/// skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryOutcome {
    pub history: StoredHistory,
    pub player_updated: bool,
}

/// One leaderboard row: a player and their summed reward over the window.
#[derive(Debug, Clone, PartialEq)]
pub struct TopRewardEntry {
    pub player_id: u64,
    pub total_reward: f64,
    /// Display fields from the player row, when it still exists.
    pub player: Option<StoredPlayer>,
}

/// One calendar day of a wallet's play history.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyHistory {
    pub date: NaiveDate,
    pub total_exp: f64,
    pub total_reward: f64,
    pub entries: Vec<StoredHistory>,
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl EconomyDb {
    /// Record a play session: history row + reward credit + player exp.
    pub fn create_history(
        &self,
        player_id: u64,
        wallet_id: &str,
        reward_number: f64,
        exp_number: f64,
        reward_type: &str,
        activity_name: &str,
    ) -> LedgerResult<HistoryOutcome> {
        let now = Utc::now();

        let txn = self.begin_write()?;
        let outcome = {
            apply_reward_delta(
                &txn,
                wallet_id,
                reward_type,
                RewardDelta {
                    available: reward_number,
                    exp: exp_number,
                    ..Default::default()
                },
                None,
                now,
            )?;

            let player_updated = {
                let mut players_table = txn.open_table(PLAYERS)?;
                let player: Option<StoredPlayer> = players_table
                    .get(player_id)?
                    .map(|guard| db::decode_row(guard.value()))
                    .transpose()?;
                match player {
                    Some(mut player) if player.wallet_id.eq_ignore_ascii_case(wallet_id) => {
                        player.total_exp += exp_number;
                        player.updated_at = now;
                        players_table.insert(player_id, db::encode_row(&player)?.as_slice())?;
                        true
                    }
                    _ => false,
                }
            };

            let id = db::next_id(&txn, "history")?;
            let history = StoredHistory {
                id,
                player_id,
                wallet_id: wallet_id.to_string(),
                reward_number,
                exp_number,
                reward_type: reward_type.to_string(),
                activity_name: activity_name.to_string(),
                created_at: now,
            };

            let mut rows_table = txn.open_table(HISTORY)?;
            rows_table.insert(id, db::encode_row(&history)?.as_slice())?;
            let mut idx_table = txn.open_table(HISTORY_WALLET_IDX)?;
            idx_table.insert(db::wallet_index_key(wallet_id, id).as_slice(), id)?;

            HistoryOutcome {
                history,
                player_updated,
            }
        };
        txn.commit()?;

        if outcome.player_updated {
            info!(
                wallet = %wallet_id,
                player = player_id,
                reward = reward_number,
                exp = exp_number,
                "play history recorded"
            );
        } else {
            warn!(
                wallet = %wallet_id,
                player = player_id,
                "play history recorded but player exp bonus skipped: player missing"
            );
        }
        Ok(outcome)
    }

    /// Newest-first play history for a wallet.
    pub fn list_history(
        &self,
        wallet_id: &str,
        skip: usize,
        limit: usize,
    ) -> LedgerResult<Vec<StoredHistory>> {
        Ok(self.list_by_wallet(HISTORY_WALLET_IDX, HISTORY, wallet_id, skip, limit)?)
    }

    /// Leaderboard: history rows in [start, end+1day) grouped by player,
    /// summing the reward numbers, descending.
    ///
    /// When `activity_name` is given the rows are additionally filtered on
    /// it and on the "SCORE" reward type. Ties order by ascending player id.
    pub fn top_rewards(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        activity_name: Option<&str>,
    ) -> LedgerResult<Vec<TopRewardEntry>> {
        let window_start = day_start(start);
        let window_end = day_start(end.checked_add_days(Days::new(1)).unwrap_or(end));

        let read_txn = self.begin_read()?;
        let rows_table = read_txn.open_table(HISTORY)?;

        let mut totals: BTreeMap<u64, f64> = BTreeMap::new();
        for entry in rows_table.iter()? {
            let entry = entry?;
            let history: StoredHistory = db::decode_row(entry.1.value())?;
            if history.created_at < window_start || history.created_at >= window_end {
                continue;
            }
            if let Some(activity) = activity_name {
                if history.activity_name != activity || history.reward_type != "SCORE" {
                    continue;
                }
            }
            *totals.entry(history.player_id).or_insert(0.0) += history.reward_number;
        }

        let players_table = read_txn.open_table(PLAYERS)?;
        let mut leaderboard = Vec::with_capacity(totals.len());
        // BTreeMap iteration ascends by player id; the stable sort below
        // keeps that order for equal totals.
        for (player_id, total_reward) in totals {
            let player = players_table
                .get(player_id)?
                .map(|guard| db::decode_row(guard.value()))
                .transpose()?;
            leaderboard.push(TopRewardEntry {
                player_id,
                total_reward,
                player,
            });
        }
        leaderboard.sort_by(|a, b| {
            b.total_reward
                .partial_cmp(&a.total_reward)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(leaderboard)
    }

    /// A wallet's history grouped by UTC calendar day over
    /// [start_date, start_date+2days).
    pub fn history_by_wallet(
        &self,
        wallet_id: &str,
        start_date: NaiveDate,
    ) -> LedgerResult<Vec<DailyHistory>> {
        let window_start = day_start(start_date);
        let window_end = day_start(start_date.checked_add_days(Days::new(2)).unwrap_or(start_date));

        let read_txn = self.begin_read()?;
        let idx_table = read_txn.open_table(HISTORY_WALLET_IDX)?;
        let rows_table = read_txn.open_table(HISTORY)?;

        let prefix = db::wallet_prefix(wallet_id);
        let prefix_end = db::wallet_prefix_end(wallet_id);

        let mut days: BTreeMap<NaiveDate, DailyHistory> = BTreeMap::new();
        for entry in idx_table.range(prefix.as_slice()..prefix_end.as_slice())? {
            let entry = entry?;
            let Some(value) = rows_table.get(entry.1.value())? else {
                continue;
            };
            let history: StoredHistory = db::decode_row(value.value())?;
            if history.created_at < window_start || history.created_at >= window_end {
                continue;
            }

            let date = history.created_at.date_naive();
            let day = days.entry(date).or_insert_with(|| DailyHistory {
                date,
                total_exp: 0.0,
                total_reward: 0.0,
                entries: Vec::new(),
            });
            day.total_exp += history.exp_number;
            day.total_reward += history.reward_number;
            day.entries.push(history);
        }

        Ok(days.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::test_db;

    #[test]
    fn history_credits_reward_exp_and_player() {
        let (_dir, db) = test_db();
        let player = db
            .create_player("0xabc", 3, "Pears", None)
            .unwrap();

        let outcome = db
            .create_history(player.id, "0xabc", 190.0, 3.0, "TOC", "PVP")
            .unwrap();
        assert!(outcome.player_updated);
        assert_eq!(outcome.history.reward_number, 190.0);

        let reward = db.find_reward("0xabc", "TOC").unwrap().unwrap();
        assert_eq!(reward.reward_available, 190.0);
        assert_eq!(reward.reward_amount, 190.0);
        assert_eq!(reward.total_exp, 3.0);

        let player = db.get_player(player.id).unwrap().unwrap();
        assert_eq!(player.total_exp, 3.0);
    }

    #[test]
    fn missing_player_is_partial_success_not_failure() {
        let (_dir, db) = test_db();

        let outcome = db
            .create_history(42, "0xabc", 10.0, 1.0, "SCORE", "PVE")
            .unwrap();
        assert!(!outcome.player_updated);

        // history and reward still landed
        assert_eq!(db.list_history("0xabc", 0, 10).unwrap().len(), 1);
        let reward = db.find_reward("0xabc", "SCORE").unwrap().unwrap();
        assert_eq!(reward.reward_available, 10.0);
    }

    #[test]
    fn player_of_another_wallet_gets_no_exp() {
        let (_dir, db) = test_db();
        let player = db.create_player("0xother", 1, "Apples", None).unwrap();

        let outcome = db
            .create_history(player.id, "0xabc", 5.0, 2.0, "TOC", "PVP")
            .unwrap();
        assert!(!outcome.player_updated);

        let player = db.get_player(player.id).unwrap().unwrap();
        assert_eq!(player.total_exp, 0.0);
    }

    #[test]
    fn top_rewards_sums_per_player_descending() {
        let (_dir, db) = test_db();
        let a = db.create_player("0xabc", 1, "Apples", None).unwrap();
        let b = db.create_player("0xdef", 2, "Bananas", None).unwrap();

        db.create_history(a.id, "0xabc", 10.0, 0.0, "SCORE", "PVP")
            .unwrap();
        db.create_history(a.id, "0xabc", 15.0, 0.0, "SCORE", "PVP")
            .unwrap();
        db.create_history(b.id, "0xdef", 40.0, 0.0, "SCORE", "PVP")
            .unwrap();

        let today = Utc::now().date_naive();
        let board = db.top_rewards(today, today, None).unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].player_id, b.id);
        assert_eq!(board[0].total_reward, 40.0);
        assert_eq!(board[1].player_id, a.id);
        assert_eq!(board[1].total_reward, 25.0);
        assert!(board[0].player.is_some());
    }

    #[test]
    fn activity_filter_also_pins_score_reward_type() {
        let (_dir, db) = test_db();
        let a = db.create_player("0xabc", 1, "Apples", None).unwrap();

        db.create_history(a.id, "0xabc", 10.0, 0.0, "SCORE", "PVP")
            .unwrap();
        db.create_history(a.id, "0xabc", 99.0, 0.0, "TOC", "PVP")
            .unwrap();
        db.create_history(a.id, "0xabc", 7.0, 0.0, "SCORE", "PVE")
            .unwrap();

        let today = Utc::now().date_naive();
        let board = db.top_rewards(today, today, Some("PVP")).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].total_reward, 10.0);
    }

    #[test]
    fn ties_order_by_ascending_player_id() {
        let (_dir, db) = test_db();
        let a = db.create_player("0xabc", 1, "Apples", None).unwrap();
        let b = db.create_player("0xdef", 1, "Pears", None).unwrap();

        db.create_history(b.id, "0xdef", 5.0, 0.0, "SCORE", "PVP")
            .unwrap();
        db.create_history(a.id, "0xabc", 5.0, 0.0, "SCORE", "PVP")
            .unwrap();

        let today = Utc::now().date_naive();
        let board = db.top_rewards(today, today, None).unwrap();
        assert_eq!(board[0].player_id, a.id);
        assert_eq!(board[1].player_id, b.id);
    }

    #[test]
    fn daily_summary_groups_todays_entries() {
        let (_dir, db) = test_db();
        let player = db.create_player("0xabc", 1, "Apples", None).unwrap();

        db.create_history(player.id, "0xabc", 10.0, 1.0, "TOC", "PVP")
            .unwrap();
        db.create_history(player.id, "0xabc", 20.0, 2.0, "TOC", "PVE")
            .unwrap();
        db.create_history(player.id, "0xother-wallet", 99.0, 9.0, "TOC", "PVP")
            .unwrap();

        let today = Utc::now().date_naive();
        let days = db.history_by_wallet("0xabc", today).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, today);
        assert_eq!(days[0].total_reward, 30.0);
        assert_eq!(days[0].total_exp, 3.0);
        assert_eq!(days[0].entries.len(), 2);
    }

    #[test]
    fn daily_summary_window_excludes_other_days() {
        let (_dir, db) = test_db();
        let player = db.create_player("0xabc", 1, "Apples", None).unwrap();
        db.create_history(player.id, "0xabc", 10.0, 1.0, "TOC", "PVP")
            .unwrap();

        // window starting two days from now excludes today's entry
        let later = Utc::now().date_naive().checked_add_days(Days::new(2)).unwrap();
        assert!(db.history_by_wallet("0xabc", later).unwrap().is_empty());
    }
}
