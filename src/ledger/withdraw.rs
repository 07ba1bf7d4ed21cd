// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Withdraw flow: append a withdrawal event and debit the ledger.
//!
//! The fee is charged on top of the requested amount, so the ledger is
//! debited more than the payout. The event row is written even when the
//! withdrawal is rejected for insufficient balance (attempted withdrawals
//! are never silently dropped); accepted rows stay `Pending` until settled
//! outside this service.

use chrono::Utc;
use tracing::{info, warn};

use super::{apply_reward_delta, LedgerError, LedgerResult, RewardDelta};
use crate::storage::db::{self, WITHDRAWALS, WITHDRAWAL_WALLET_IDX};
use crate::storage::{EconomyDb, StoredWithdrawal, TransferStatus};

/// Amount the ledger is debited for a withdrawal of `token_balance`:
/// the payout plus the fee percentage on top.
pub fn fee_adjusted_amount(token_balance: f64, fee_percent: f64) -> f64 {
    token_balance + (fee_percent / 100.0) * token_balance
}

/// Result of a withdrawal request. Both variants carry a persisted event
/// row; only `Accepted` has debited the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum WithdrawOutcome {
    Accepted(StoredWithdrawal),
    InsufficientFunds(StoredWithdrawal),
}

impl EconomyDb {
    /// Request a withdrawal of `token_balance` units of `token_type`.
    ///
    /// Sufficiency is checked against the fee-adjusted amount; a rejected
    /// request commits a `Fail` event row without touching the ledger.
    pub fn create_withdrawal(
        &self,
        wallet_id: &str,
        token_balance: f64,
        token_type: &str,
        fee_percent: f64,
    ) -> LedgerResult<WithdrawOutcome> {
        if !(token_balance > 0.0) {
            return Err(LedgerError::BusinessRule(
                "withdraw amount must be positive".to_string(),
            ));
        }

        let fee_adjusted = fee_adjusted_amount(token_balance, fee_percent);
        let now = Utc::now();

        let txn = self.begin_write()?;
        let outcome = {
            let applied = apply_reward_delta(
                &txn,
                wallet_id,
                token_type,
                RewardDelta {
                    available: -fee_adjusted,
                    ..Default::default()
                },
                Some(fee_adjusted),
                now,
            );
            let status = match applied {
                Ok(_) => TransferStatus::Pending,
                Err(LedgerError::BusinessRule(_)) => TransferStatus::Fail,
                Err(err) => return Err(err),
            };

            let id = db::next_id(&txn, "withdrawals")?;
            let withdrawal = StoredWithdrawal {
                id,
                wallet_id: wallet_id.to_string(),
                token_balance,
                token_type: token_type.to_string(),
                status,
                created_at: now,
                updated_at: now,
            };

            let mut rows_table = txn.open_table(WITHDRAWALS)?;
            rows_table.insert(id, db::encode_row(&withdrawal)?.as_slice())?;
            let mut idx_table = txn.open_table(WITHDRAWAL_WALLET_IDX)?;
            idx_table.insert(db::wallet_index_key(wallet_id, id).as_slice(), id)?;

            match status {
                TransferStatus::Pending => WithdrawOutcome::Accepted(withdrawal),
                _ => WithdrawOutcome::InsufficientFunds(withdrawal),
            }
        };
        txn.commit()?;

        match &outcome {
            WithdrawOutcome::Accepted(w) => info!(
                wallet = %w.wallet_id,
                token = %w.token_type,
                amount = token_balance,
                debited = fee_adjusted,
                "withdrawal accepted"
            ),
            WithdrawOutcome::InsufficientFunds(w) => warn!(
                wallet = %w.wallet_id,
                token = %w.token_type,
                amount = token_balance,
                required = fee_adjusted,
                "withdrawal rejected: insufficient balance"
            ),
        }
        Ok(outcome)
    }

    /// Newest-first withdrawals for a wallet.
    pub fn list_withdrawals(
        &self,
        wallet_id: &str,
        skip: usize,
        limit: usize,
    ) -> LedgerResult<Vec<StoredWithdrawal>> {
        Ok(self.list_by_wallet(WITHDRAWAL_WALLET_IDX, WITHDRAWALS, wallet_id, skip, limit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::test_db;

    #[test]
    fn fee_is_charged_on_top_of_the_payout() {
        assert_eq!(fee_adjusted_amount(50.0, 5.0), 52.5);
        assert_eq!(fee_adjusted_amount(100.0, 0.0), 100.0);
    }

    #[test]
    fn accepted_withdrawal_debits_fee_adjusted_amount() {
        let (_dir, db) = test_db();
        db.create_deposit("0xabc", 100.0, "TOC").unwrap();

        let outcome = db.create_withdrawal("0xabc", 50.0, "TOC", 5.0).unwrap();
        let WithdrawOutcome::Accepted(withdrawal) = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(withdrawal.status, TransferStatus::Pending);

        let reward = db.find_reward("0xabc", "TOC").unwrap().unwrap();
        assert_eq!(reward.reward_amount, 47.5);
        assert_eq!(reward.reward_available, 47.5);
    }

    #[test]
    fn insufficient_balance_keeps_ledger_and_logs_fail_row() {
        let (_dir, db) = test_db();
        db.create_deposit("0xabc", 52.0, "TOC").unwrap();

        // 50 + 5% fee = 52.5 > 52
        let outcome = db.create_withdrawal("0xabc", 50.0, "TOC", 5.0).unwrap();
        let WithdrawOutcome::InsufficientFunds(withdrawal) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(withdrawal.status, TransferStatus::Fail);

        let reward = db.find_reward("0xabc", "TOC").unwrap().unwrap();
        assert_eq!(reward.reward_amount, 52.0);

        // the attempt is still on record
        let rows = db.list_withdrawals("0xabc", 0, 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, TransferStatus::Fail);
    }

    #[test]
    fn withdrawal_against_missing_ledger_is_rejected() {
        let (_dir, db) = test_db();

        let outcome = db.create_withdrawal("0xnew", 1.0, "TOC", 5.0).unwrap();
        assert!(matches!(outcome, WithdrawOutcome::InsufficientFunds(_)));
        assert!(db.find_reward("0xnew", "TOC").unwrap().is_none());
    }

    #[test]
    fn exact_balance_is_sufficient() {
        let (_dir, db) = test_db();
        db.create_deposit("0xabc", 52.5, "TOC").unwrap();

        let outcome = db.create_withdrawal("0xabc", 50.0, "TOC", 5.0).unwrap();
        assert!(matches!(outcome, WithdrawOutcome::Accepted(_)));

        let reward = db.find_reward("0xabc", "TOC").unwrap().unwrap();
        assert_eq!(reward.reward_amount, 0.0);
    }
}
