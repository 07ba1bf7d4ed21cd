// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-side queries over the reward ledger. All mutation goes through the
//! flows in the sibling modules.

use redb::ReadableTable;

use super::LedgerResult;
use crate::storage::db::{self, REWARDS, REWARD_KEY_IDX};
use crate::storage::{EconomyDb, StoredReward};

impl EconomyDb {
    /// The unique ledger row for (wallet, reward type), if any. A missing
    /// row means a zero balance.
    pub fn find_reward(
        &self,
        wallet_id: &str,
        reward_type: &str,
    ) -> LedgerResult<Option<StoredReward>> {
        let key = db::reward_key(wallet_id, reward_type);

        let read_txn = self.begin_read()?;
        let idx_table = read_txn.open_table(REWARD_KEY_IDX)?;
        let Some(id) = idx_table.get(key.as_str())?.map(|guard| guard.value()) else {
            return Ok(None);
        };

        let rows_table = read_txn.open_table(REWARDS)?;
        Ok(rows_table
            .get(id)?
            .map(|guard| db::decode_row(guard.value()))
            .transpose()?)
    }

    /// Every ledger row of a wallet, in creation order.
    pub fn list_rewards(&self, wallet_id: &str) -> LedgerResult<Vec<StoredReward>> {
        let read_txn = self.begin_read()?;
        let rows_table = read_txn.open_table(REWARDS)?;

        let mut rewards = Vec::new();
        for entry in rows_table.iter()? {
            let entry = entry?;
            let reward: StoredReward = db::decode_row(entry.1.value())?;
            if reward.wallet_id.eq_ignore_ascii_case(wallet_id) {
                rewards.push(reward);
            }
        }
        Ok(rewards)
    }
}

#[cfg(test)]
mod tests {
    use crate::ledger::test_support::test_db;

    #[test]
    fn find_reward_is_none_for_unknown_pairs() {
        let (_dir, db) = test_db();
        db.create_deposit("0xabc", 10.0, "TOC").unwrap();

        assert!(db.find_reward("0xabc", "SNCT").unwrap().is_none());
        assert!(db.find_reward("0xother", "TOC").unwrap().is_none());
    }

    #[test]
    fn list_rewards_returns_only_the_wallets_ledgers() {
        let (_dir, db) = test_db();
        db.create_deposit("0xabc", 10.0, "TOC").unwrap();
        db.create_deposit("0xabc", 20.0, "SNCT").unwrap();
        db.create_deposit("0xother", 30.0, "TOC").unwrap();

        let rewards = db.list_rewards("0xABC").unwrap();
        assert_eq!(rewards.len(), 2);
        assert!(rewards.iter().all(|r| r.wallet_id == "0xabc"));
    }
}
