// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Reward Ledger Workflows
//!
//! The mutation workflows of the game economy: deposits, withdrawals,
//! claims, play history, turn allowances and mana refills, plus the user
//! identity records the login protocol needs.
//!
//! Every flow is an `impl EconomyDb` block that runs inside a single redb
//! write transaction. redb serializes write transactions, so two concurrent
//! requests against the same (wallet, reward type) cannot lose an update,
//! and flows that touch a second row (player exp, turn rows, event rows)
//! commit or roll back as a unit.
//!
//! ## The ledger delta
//!
//! All balance mutations funnel through [`apply_reward_delta`]: find the
//! unique reward row for (wallet, reward type), treat a missing row as an
//! all-zero baseline, add the deltas and recompute
//! `reward_amount = reward_available + reward_withdrawn`. Flows that debit
//! pass a minimum-balance guard; a failed guard leaves the row untouched.

pub mod claim;
pub mod deposit;
pub mod history;
pub mod players;
pub mod rewards;
pub mod turn;
pub mod users;
pub mod withdraw;

pub use claim::net_claim_amount;
pub use history::{DailyHistory, HistoryOutcome, TopRewardEntry};
pub use players::{mana_for_star, pick_skin, pick_star, toc_cost_for, PlayerRoll};
pub use turn::turn_limit_for_star;
pub use withdraw::{fee_adjusted_amount, WithdrawOutcome};

use chrono::{DateTime, Utc};
use redb::{ReadableTable, WriteTransaction};

use crate::storage::db::{self, REWARDS, REWARD_KEY_IDX};
use crate::storage::{StorageError, StoredReward};

/// Errors produced by ledger workflows.
///
/// The first four variants map one-to-one onto the API error taxonomy
/// (404 / 409 / 401 / 422); storage failures surface as 500.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BusinessRule(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<redb::TableError> for LedgerError {
    fn from(err: redb::TableError) -> Self {
        Self::Storage(err.into())
    }
}

impl From<redb::StorageError> for LedgerError {
    fn from(err: redb::StorageError) -> Self {
        Self::Storage(err.into())
    }
}

impl From<redb::CommitError> for LedgerError {
    fn from(err: redb::CommitError) -> Self {
        Self::Storage(err.into())
    }
}

impl From<redb::TransactionError> for LedgerError {
    fn from(err: redb::TransactionError) -> Self {
        Self::Storage(err.into())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.into())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Field deltas for one ledger write.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RewardDelta {
    pub available: f64,
    pub withdrawn: f64,
    pub exp: f64,
}

/// Find-or-create the reward row for (wallet, reward type) and apply `delta`
/// inside the caller's write transaction.
///
/// `min_amount` is the debit guard: when set, the current `reward_amount`
/// (zero for a missing row) must be at least that value or the call fails
/// with a business-rule error and writes nothing.
pub(crate) fn apply_reward_delta(
    txn: &WriteTransaction,
    wallet_id: &str,
    reward_type: &str,
    delta: RewardDelta,
    min_amount: Option<f64>,
    now: DateTime<Utc>,
) -> LedgerResult<StoredReward> {
    let key = db::reward_key(wallet_id, reward_type);

    let mut idx_table = txn.open_table(REWARD_KEY_IDX)?;
    let mut rows_table = txn.open_table(REWARDS)?;

    let existing_id = idx_table.get(key.as_str())?.map(|guard| guard.value());
    let existing: Option<StoredReward> = match existing_id {
        Some(id) => rows_table
            .get(id)?
            .map(|guard| db::decode_row(guard.value()))
            .transpose()?,
        None => None,
    };

    let current_amount = existing.as_ref().map(|r| r.reward_amount).unwrap_or(0.0);
    if let Some(required) = min_amount {
        if current_amount < required {
            return Err(LedgerError::BusinessRule(format!(
                "insufficient {reward_type} balance: {current_amount} available, {required} required"
            )));
        }
    }

    let mut reward = match existing {
        Some(reward) => reward,
        None => StoredReward {
            id: db::next_id(txn, "rewards")?,
            wallet_id: wallet_id.to_string(),
            reward_type: reward_type.to_string(),
            reward_amount: 0.0,
            reward_available: 0.0,
            reward_withdrawn: 0.0,
            total_exp: 0.0,
            created_at: now,
            updated_at: now,
        },
    };

    reward.reward_available += delta.available;
    reward.reward_withdrawn += delta.withdrawn;
    reward.total_exp += delta.exp;
    reward.reward_amount = reward.reward_available + reward.reward_withdrawn;
    reward.updated_at = now;

    rows_table.insert(reward.id, db::encode_row(&reward)?.as_slice())?;
    if existing_id.is_none() {
        idx_table.insert(key.as_str(), reward.id)?;
    }

    Ok(reward)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::storage::EconomyDb;

    /// Fresh on-disk database for flow tests; the TempDir guard keeps the
    /// backing file alive for the test's duration.
    pub fn test_db() -> (tempfile::TempDir, EconomyDb) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = EconomyDb::open(&dir.path().join("economy.redb")).expect("open db");
        (dir, db)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::test_db;
    use super::*;

    #[test]
    fn missing_row_seeds_from_delta() {
        let (_dir, db) = test_db();

        let txn = db.begin_write().unwrap();
        let reward = apply_reward_delta(
            &txn,
            "0xabc",
            "TOC",
            RewardDelta {
                available: 100.0,
                exp: 3.0,
                ..Default::default()
            },
            None,
            Utc::now(),
        )
        .unwrap();
        txn.commit().unwrap();

        assert_eq!(reward.reward_available, 100.0);
        assert_eq!(reward.reward_withdrawn, 0.0);
        assert_eq!(reward.reward_amount, 100.0);
        assert_eq!(reward.total_exp, 3.0);
    }

    #[test]
    fn existing_row_accumulates_and_recomputes_amount() {
        let (_dir, db) = test_db();
        let now = Utc::now();

        let txn = db.begin_write().unwrap();
        apply_reward_delta(
            &txn,
            "0xabc",
            "TOC",
            RewardDelta {
                available: 40.0,
                ..Default::default()
            },
            None,
            now,
        )
        .unwrap();
        let reward = apply_reward_delta(
            &txn,
            "0xABC", // key lookup is wallet-case-insensitive
            "TOC",
            RewardDelta {
                available: 2.5,
                withdrawn: 7.5,
                ..Default::default()
            },
            None,
            now,
        )
        .unwrap();
        txn.commit().unwrap();

        assert_eq!(reward.reward_available, 42.5);
        assert_eq!(reward.reward_withdrawn, 7.5);
        assert_eq!(reward.reward_amount, 50.0);
    }

    #[test]
    fn reward_types_are_independent_ledgers() {
        let (_dir, db) = test_db();
        let now = Utc::now();

        let txn = db.begin_write().unwrap();
        let toc = apply_reward_delta(
            &txn,
            "0xabc",
            "TOC",
            RewardDelta {
                available: 10.0,
                ..Default::default()
            },
            None,
            now,
        )
        .unwrap();
        let snct = apply_reward_delta(
            &txn,
            "0xabc",
            "SNCT",
            RewardDelta {
                available: 20.0,
                ..Default::default()
            },
            None,
            now,
        )
        .unwrap();
        txn.commit().unwrap();

        assert_ne!(toc.id, snct.id);
        assert_eq!(toc.reward_amount, 10.0);
        assert_eq!(snct.reward_amount, 20.0);
    }

    #[test]
    fn debit_guard_rejects_without_writing() {
        let (_dir, db) = test_db();
        let now = Utc::now();

        let txn = db.begin_write().unwrap();
        apply_reward_delta(
            &txn,
            "0xabc",
            "TOC",
            RewardDelta {
                available: 50.0,
                ..Default::default()
            },
            None,
            now,
        )
        .unwrap();
        let err = apply_reward_delta(
            &txn,
            "0xabc",
            "TOC",
            RewardDelta {
                available: -52.5,
                ..Default::default()
            },
            Some(52.5),
            now,
        )
        .unwrap_err();
        txn.commit().unwrap();

        assert!(matches!(err, LedgerError::BusinessRule(_)));
        let reward = db.find_reward("0xabc", "TOC").unwrap().unwrap();
        assert_eq!(reward.reward_amount, 50.0);
    }

    #[test]
    fn debit_guard_rejects_missing_row() {
        let (_dir, db) = test_db();

        let txn = db.begin_write().unwrap();
        let err = apply_reward_delta(
            &txn,
            "0xnew",
            "TOC",
            RewardDelta {
                available: -1.0,
                ..Default::default()
            },
            Some(1.0),
            Utc::now(),
        )
        .unwrap_err();
        drop(txn);

        assert!(matches!(err, LedgerError::BusinessRule(_)));
        assert!(db.find_reward("0xnew", "TOC").unwrap().is_none());
    }
}
