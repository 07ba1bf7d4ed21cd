// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User identity records for the wallet-signature login protocol.
//!
//! Addresses are stored lowercased; uniqueness is case-insensitive. The
//! nonce is rotated through [`EconomyDb::rotate_nonce`] on every successful
//! login, which must commit before a session token is issued.

use chrono::Utc;
use redb::ReadableTable;

use super::{LedgerError, LedgerResult};
use crate::storage::db::{self, USERS, USER_ADDRESS_IDX};
use crate::storage::{EconomyDb, StoredUser};

impl EconomyDb {
    /// Register a new wallet identity.
    ///
    /// Fails with a conflict when the address (case-insensitive) is taken.
    /// The caller supplies the freshly drawn nonce.
    pub fn register_user(
        &self,
        public_address: &str,
        wallet_id: &str,
        nonce: u64,
    ) -> LedgerResult<StoredUser> {
        let address = public_address.to_lowercase();
        let now = Utc::now();

        let txn = self.begin_write()?;
        let user = {
            let mut idx_table = txn.open_table(USER_ADDRESS_IDX)?;
            if idx_table.get(address.as_str())?.is_some() {
                return Err(LedgerError::Conflict(
                    "publicAddress must be unique".to_string(),
                ));
            }

            let id = db::next_id(&txn, "users")?;
            let user = StoredUser {
                id,
                public_address: address.clone(),
                nonce,
                wallet_id: wallet_id.to_string(),
                created_at: now,
                updated_at: now,
            };

            let mut rows_table = txn.open_table(USERS)?;
            rows_table.insert(id, db::encode_row(&user)?.as_slice())?;
            idx_table.insert(address.as_str(), id)?;
            user
        };
        txn.commit()?;

        Ok(user)
    }

    /// Look up a user by public address (case-insensitive). No mutation.
    pub fn find_user_by_address(&self, public_address: &str) -> LedgerResult<Option<StoredUser>> {
        let address = public_address.to_lowercase();

        let read_txn = self.begin_read()?;
        let idx_table = read_txn.open_table(USER_ADDRESS_IDX)?;
        let Some(id) = idx_table.get(address.as_str())?.map(|guard| guard.value()) else {
            return Ok(None);
        };

        let rows_table = read_txn.open_table(USERS)?;
        rows_table
            .get(id)?
            .map(|guard| db::decode_row(guard.value()))
            .transpose()
            .map_err(LedgerError::from)
    }

    /// Persist a fresh nonce for the user, invalidating the previous
    /// challenge.
    pub fn rotate_nonce(&self, user_id: u64, new_nonce: u64) -> LedgerResult<StoredUser> {
        let now = Utc::now();

        let txn = self.begin_write()?;
        let user = {
            let mut rows_table = txn.open_table(USERS)?;
            let mut user: StoredUser = rows_table
                .get(user_id)?
                .map(|guard| db::decode_row(guard.value()))
                .transpose()?
                .ok_or_else(|| LedgerError::NotFound("user".to_string()))?;

            user.nonce = new_nonce;
            user.updated_at = now;
            rows_table.insert(user_id, db::encode_row(&user)?.as_slice())?;
            user
        };
        txn.commit()?;

        Ok(user)
    }
}
