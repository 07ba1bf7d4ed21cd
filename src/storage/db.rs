// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded economy database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! Primary tables map an auto-increment `u64` id to a JSON-encoded row:
//!
//! - `users`, `players`, `rewards`, `deposits`, `withdrawals`, `claims`,
//!   `history`, `turns`
//!
//! Secondary index tables:
//!
//! - `user_address_idx`: lowercase public address → user id (uniqueness)
//! - `reward_key_idx`: `wallet|type` → reward id (the ledger uniqueness key)
//! - `*_wallet_idx`: composite key (`wallet|id_be`) → id, for by-wallet scans
//! - `turn_key_idx`: composite key (`wallet|player_be|id_be`) → turn id
//! - `counters`: table name → last allocated id
//!
//! All ledger flows (see the `ledger` module) run inside a single write
//! transaction. redb serializes write transactions, so read-modify-write
//! sequences on the same reward row cannot interleave and multi-row writes
//! commit or roll back together.

use std::path::Path;

use redb::{Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");
pub(crate) const USER_ADDRESS_IDX: TableDefinition<&str, u64> =
    TableDefinition::new("user_address_idx");

pub(crate) const PLAYERS: TableDefinition<u64, &[u8]> = TableDefinition::new("players");

pub(crate) const REWARDS: TableDefinition<u64, &[u8]> = TableDefinition::new("rewards");
pub(crate) const REWARD_KEY_IDX: TableDefinition<&str, u64> =
    TableDefinition::new("reward_key_idx");

pub(crate) const DEPOSITS: TableDefinition<u64, &[u8]> = TableDefinition::new("deposits");
pub(crate) const DEPOSIT_WALLET_IDX: TableDefinition<&[u8], u64> =
    TableDefinition::new("deposit_wallet_idx");

pub(crate) const WITHDRAWALS: TableDefinition<u64, &[u8]> = TableDefinition::new("withdrawals");
pub(crate) const WITHDRAWAL_WALLET_IDX: TableDefinition<&[u8], u64> =
    TableDefinition::new("withdrawal_wallet_idx");

pub(crate) const CLAIMS: TableDefinition<u64, &[u8]> = TableDefinition::new("claims");
pub(crate) const CLAIM_WALLET_IDX: TableDefinition<&[u8], u64> =
    TableDefinition::new("claim_wallet_idx");

pub(crate) const HISTORY: TableDefinition<u64, &[u8]> = TableDefinition::new("history");
pub(crate) const HISTORY_WALLET_IDX: TableDefinition<&[u8], u64> =
    TableDefinition::new("history_wallet_idx");

pub(crate) const TURNS: TableDefinition<u64, &[u8]> = TableDefinition::new("turns");
pub(crate) const TURN_KEY_IDX: TableDefinition<&[u8], u64> = TableDefinition::new("turn_key_idx");

/// Id allocation: table name → last id handed out.
pub(crate) const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Key Helpers
// =============================================================================

/// Ledger uniqueness key: `lowercase_wallet|reward_type`.
pub(crate) fn reward_key(wallet_id: &str, reward_type: &str) -> String {
    format!("{}|{}", wallet_id.to_lowercase(), reward_type)
}

/// Composite key for the per-wallet event indexes.
///
/// Format: `lowercase_wallet | id_be_bytes`. Big-endian ids keep prefix
/// scans in insertion order; callers reverse the range for newest-first.
pub(crate) fn wallet_index_key(wallet_id: &str, id: u64) -> Vec<u8> {
    let wallet = wallet_id.to_lowercase();
    let mut key = Vec::with_capacity(wallet.len() + 1 + 8);
    key.extend_from_slice(wallet.as_bytes());
    key.push(b'|');
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// Lower bound for a wallet prefix scan.
pub(crate) fn wallet_prefix(wallet_id: &str) -> Vec<u8> {
    let wallet = wallet_id.to_lowercase();
    let mut prefix = Vec::with_capacity(wallet.len() + 1);
    prefix.extend_from_slice(wallet.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Upper bound for a wallet prefix scan (prefix plus 0xFF padding).
pub(crate) fn wallet_prefix_end(wallet_id: &str) -> Vec<u8> {
    let mut end = wallet_prefix(wallet_id);
    end.extend_from_slice(&[0xFF; 9]);
    end
}

/// Composite key for the turn index: `lowercase_wallet|player_be|id_be`.
pub(crate) fn turn_index_key(wallet_id: &str, player_id: u64, id: u64) -> Vec<u8> {
    let mut key = turn_prefix(wallet_id, player_id);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

pub(crate) fn turn_prefix(wallet_id: &str, player_id: u64) -> Vec<u8> {
    let wallet = wallet_id.to_lowercase();
    let mut prefix = Vec::with_capacity(wallet.len() + 1 + 8 + 1);
    prefix.extend_from_slice(wallet.as_bytes());
    prefix.push(b'|');
    prefix.extend_from_slice(&player_id.to_be_bytes());
    prefix.push(b'|');
    prefix
}

pub(crate) fn turn_prefix_end(wallet_id: &str, player_id: u64) -> Vec<u8> {
    let mut end = turn_prefix(wallet_id, player_id);
    end.extend_from_slice(&[0xFF; 9]);
    end
}

// =============================================================================
// Row Codec
// =============================================================================

pub(crate) fn encode_row<T: Serialize>(row: &T) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(row)?)
}

pub(crate) fn decode_row<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

// =============================================================================
// EconomyDb
// =============================================================================

/// Handle to the embedded economy database.
pub struct EconomyDb {
    db: Database,
}

impl EconomyDb {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_ADDRESS_IDX)?;
            let _ = write_txn.open_table(PLAYERS)?;
            let _ = write_txn.open_table(REWARDS)?;
            let _ = write_txn.open_table(REWARD_KEY_IDX)?;
            let _ = write_txn.open_table(DEPOSITS)?;
            let _ = write_txn.open_table(DEPOSIT_WALLET_IDX)?;
            let _ = write_txn.open_table(WITHDRAWALS)?;
            let _ = write_txn.open_table(WITHDRAWAL_WALLET_IDX)?;
            let _ = write_txn.open_table(CLAIMS)?;
            let _ = write_txn.open_table(CLAIM_WALLET_IDX)?;
            let _ = write_txn.open_table(HISTORY)?;
            let _ = write_txn.open_table(HISTORY_WALLET_IDX)?;
            let _ = write_txn.open_table(TURNS)?;
            let _ = write_txn.open_table(TURN_KEY_IDX)?;
            let _ = write_txn.open_table(COUNTERS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub(crate) fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    pub(crate) fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Load one row by id from a primary table.
    pub(crate) fn read_one<T: DeserializeOwned>(
        &self,
        table: TableDefinition<'static, u64, &'static [u8]>,
        id: u64,
    ) -> StorageResult<Option<T>> {
        let read_txn = self.begin_read()?;
        let rows = read_txn.open_table(table)?;
        rows.get(id)?
            .map(|guard| decode_row(guard.value()))
            .transpose()
    }

    /// Paginated newest-first listing over one of the per-wallet indexes.
    pub(crate) fn list_by_wallet<T: DeserializeOwned>(
        &self,
        index: TableDefinition<'static, &'static [u8], u64>,
        table: TableDefinition<'static, u64, &'static [u8]>,
        wallet_id: &str,
        skip: usize,
        limit: usize,
    ) -> StorageResult<Vec<T>> {
        let read_txn = self.begin_read()?;
        let idx_table = read_txn.open_table(index)?;
        let rows_table = read_txn.open_table(table)?;

        let prefix = wallet_prefix(wallet_id);
        let prefix_end = wallet_prefix_end(wallet_id);

        let mut results = Vec::with_capacity(limit);
        let range = idx_table.range(prefix.as_slice()..prefix_end.as_slice())?;

        // Index keys ascend with id; reverse for newest-first
        for entry in range.rev().skip(skip) {
            let entry = entry?;
            let id = entry.1.value();
            if let Some(value) = rows_table.get(id)? {
                results.push(decode_row(value.value())?);
            }
            if results.len() >= limit {
                break;
            }
        }

        Ok(results)
    }
}

/// Allocate the next id for `counter` within the caller's write transaction.
pub(crate) fn next_id(txn: &WriteTransaction, counter: &str) -> StorageResult<u64> {
    let mut table = txn.open_table(COUNTERS)?;
    let next = table.get(counter)?.map(|guard| guard.value()).unwrap_or(0) + 1;
    table.insert(counter, next)?;
    Ok(next)
}
