// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claim flow: record an off-system payout claim and credit the ledger with
//! the net-of-fee amount.
//!
//! Unlike withdrawals, the fee is subtracted from the claimed amount rather
//! than charged on top. The claim row and the ledger credit share one write
//! transaction; a committed claim is always `Success`.

use chrono::Utc;
use redb::ReadableTable;
use tracing::info;

use super::{apply_reward_delta, LedgerError, LedgerResult, RewardDelta};
use crate::storage::db::{self, CLAIMS, CLAIM_WALLET_IDX};
use crate::storage::{ClaimStatus, EconomyDb, StoredClaim};

/// Amount credited to the ledger for a claim of `claim_amount`: the claimed
/// amount minus the fee percentage.
pub fn net_claim_amount(claim_amount: f64, fee_percent: f64) -> f64 {
    claim_amount - (fee_percent / 100.0) * claim_amount
}

impl EconomyDb {
    /// Record a claim and credit the wallet's ledger with the net amount.
    pub fn create_claim(
        &self,
        wallet_id: &str,
        claim_reward_amount: f64,
        claim_reward_type: &str,
        transaction_id: Option<String>,
        fee_percent: f64,
    ) -> LedgerResult<StoredClaim> {
        if !(claim_reward_amount > 0.0) {
            return Err(LedgerError::BusinessRule(
                "claim amount must be positive".to_string(),
            ));
        }

        let net_amount = net_claim_amount(claim_reward_amount, fee_percent);
        let now = Utc::now();

        let txn = self.begin_write()?;
        let claim = {
            apply_reward_delta(
                &txn,
                wallet_id,
                claim_reward_type,
                RewardDelta {
                    available: net_amount,
                    ..Default::default()
                },
                None,
                now,
            )?;

            let id = db::next_id(&txn, "claims")?;
            let claim = StoredClaim {
                id,
                wallet_id: wallet_id.to_string(),
                claim_reward_amount,
                claim_reward_type: claim_reward_type.to_string(),
                claim_status: ClaimStatus::Success,
                transaction_id,
                created_at: now,
                updated_at: now,
            };

            let mut rows_table = txn.open_table(CLAIMS)?;
            rows_table.insert(id, db::encode_row(&claim)?.as_slice())?;
            let mut idx_table = txn.open_table(CLAIM_WALLET_IDX)?;
            idx_table.insert(db::wallet_index_key(wallet_id, id).as_slice(), id)?;
            claim
        };
        txn.commit()?;

        info!(
            wallet = %claim.wallet_id,
            token = %claim.claim_reward_type,
            claimed = claim_reward_amount,
            credited = net_amount,
            "claim credited"
        );
        Ok(claim)
    }

    /// Replace the mutable fields of an existing claim (settlement tooling).
    /// Does not touch the reward ledger.
    pub fn update_claim(
        &self,
        claim_id: u64,
        wallet_id: &str,
        claim_reward_amount: f64,
        claim_reward_type: &str,
        claim_status: ClaimStatus,
        transaction_id: Option<String>,
    ) -> LedgerResult<StoredClaim> {
        let now = Utc::now();

        let txn = self.begin_write()?;
        let claim = {
            let mut rows_table = txn.open_table(CLAIMS)?;
            let mut claim: StoredClaim = rows_table
                .get(claim_id)?
                .map(|guard| db::decode_row(guard.value()))
                .transpose()?
                .ok_or_else(|| LedgerError::NotFound("claim".to_string()))?;

            claim.wallet_id = wallet_id.to_string();
            claim.claim_reward_amount = claim_reward_amount;
            claim.claim_reward_type = claim_reward_type.to_string();
            claim.claim_status = claim_status;
            claim.transaction_id = transaction_id;
            claim.updated_at = now;
            rows_table.insert(claim_id, db::encode_row(&claim)?.as_slice())?;
            claim
        };
        txn.commit()?;

        Ok(claim)
    }

    /// Newest-first claims for a wallet.
    pub fn list_claims(
        &self,
        wallet_id: &str,
        skip: usize,
        limit: usize,
    ) -> LedgerResult<Vec<StoredClaim>> {
        Ok(self.list_by_wallet(CLAIM_WALLET_IDX, CLAIMS, wallet_id, skip, limit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::test_db;

    #[test]
    fn net_amount_subtracts_the_fee() {
        assert_eq!(net_claim_amount(100.0, 5.0), 95.0);
        assert_eq!(net_claim_amount(40.0, 0.0), 40.0);
    }

    #[test]
    fn claim_credits_net_of_fee_to_available() {
        let (_dir, db) = test_db();

        let claim = db
            .create_claim("0xabc", 100.0, "TOC", None, 5.0)
            .unwrap();
        assert_eq!(claim.claim_status, ClaimStatus::Success);
        assert_eq!(claim.claim_reward_amount, 100.0);

        let reward = db.find_reward("0xabc", "TOC").unwrap().unwrap();
        assert_eq!(reward.reward_available, 95.0);
        assert_eq!(reward.reward_amount, 95.0);
    }

    #[test]
    fn claim_accumulates_on_existing_ledger() {
        let (_dir, db) = test_db();
        db.create_deposit("0xabc", 10.0, "TOC").unwrap();

        db.create_claim("0xabc", 100.0, "TOC", Some("0xtx".to_string()), 5.0)
            .unwrap();
        let reward = db.find_reward("0xabc", "TOC").unwrap().unwrap();
        assert_eq!(reward.reward_available, 105.0);
    }

    #[test]
    fn update_claim_replaces_fields_without_ledger_writes() {
        let (_dir, db) = test_db();
        let claim = db.create_claim("0xabc", 100.0, "TOC", None, 5.0).unwrap();
        let before = db.find_reward("0xabc", "TOC").unwrap().unwrap();

        let updated = db
            .update_claim(
                claim.id,
                "0xabc",
                100.0,
                "TOC",
                ClaimStatus::Failed,
                Some("0xdeadbeef".to_string()),
            )
            .unwrap();
        assert_eq!(updated.claim_status, ClaimStatus::Failed);
        assert_eq!(updated.transaction_id.as_deref(), Some("0xdeadbeef"));

        let after = db.find_reward("0xabc", "TOC").unwrap().unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn update_missing_claim_is_not_found() {
        let (_dir, db) = test_db();
        let err = db
            .update_claim(5, "0xabc", 1.0, "TOC", ClaimStatus::Success, None)
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }
}
