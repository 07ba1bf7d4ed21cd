// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deposit flow: append a deposit event and credit the matching ledger.
//!
//! The event row and the reward credit share one write transaction, so a
//! committed deposit always carries status `Success`; a storage failure
//! rolls both back and the caller must re-submit (which creates a new row
//! rather than retrying the old one).

use chrono::Utc;
use tracing::info;

use super::{apply_reward_delta, LedgerError, LedgerResult, RewardDelta};
use crate::storage::db::{self, DEPOSITS, DEPOSIT_WALLET_IDX};
use crate::storage::{EconomyDb, StoredDeposit, TransferStatus};

impl EconomyDb {
    /// Record a deposit of `token_balance` units of `token_type` and credit
    /// the wallet's matching reward ledger.
    pub fn create_deposit(
        &self,
        wallet_id: &str,
        token_balance: f64,
        token_type: &str,
    ) -> LedgerResult<StoredDeposit> {
        if !(token_balance > 0.0) {
            return Err(LedgerError::BusinessRule(
                "deposit amount must be positive".to_string(),
            ));
        }

        let now = Utc::now();
        let txn = self.begin_write()?;
        let deposit = {
            apply_reward_delta(
                &txn,
                wallet_id,
                token_type,
                RewardDelta {
                    available: token_balance,
                    ..Default::default()
                },
                None,
                now,
            )?;

            let id = db::next_id(&txn, "deposits")?;
            let deposit = StoredDeposit {
                id,
                wallet_id: wallet_id.to_string(),
                token_balance,
                token_type: token_type.to_string(),
                status: TransferStatus::Success,
                created_at: now,
                updated_at: now,
            };

            let mut rows_table = txn.open_table(DEPOSITS)?;
            rows_table.insert(id, db::encode_row(&deposit)?.as_slice())?;
            let mut idx_table = txn.open_table(DEPOSIT_WALLET_IDX)?;
            idx_table.insert(db::wallet_index_key(wallet_id, id).as_slice(), id)?;
            deposit
        };
        txn.commit()?;

        info!(
            wallet = %deposit.wallet_id,
            token = %deposit.token_type,
            amount = token_balance,
            "deposit credited"
        );
        Ok(deposit)
    }

    /// Newest-first deposits for a wallet.
    pub fn list_deposits(
        &self,
        wallet_id: &str,
        skip: usize,
        limit: usize,
    ) -> LedgerResult<Vec<StoredDeposit>> {
        Ok(self.list_by_wallet(DEPOSIT_WALLET_IDX, DEPOSITS, wallet_id, skip, limit)?)
    }
}
