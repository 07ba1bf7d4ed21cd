// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Economy Storage Module
//!
//! Persistent storage for the game economy, backed by an embedded redb
//! database (pure Rust, ACID).
//!
//! ## Layout
//!
//! ```text
//! {DATA_DIR}/economy.redb
//! ```
//!
//! One primary table per entity (u64 id → JSON row) plus secondary index
//! tables for uniqueness and by-wallet scans; see [`db`] for the full table
//! layout. Stored row types live in [`records`].
//!
//! The mutation workflows that operate on these tables live in the `ledger`
//! module as `impl EconomyDb` blocks; everything here is mechanism, not
//! policy.

pub mod db;
pub mod records;

pub use db::{EconomyDb, StorageError, StorageResult};
pub use records::{
    ClaimStatus, StoredClaim, StoredDeposit, StoredHistory, StoredPlayer, StoredReward,
    StoredTurn, StoredUser, StoredWithdrawal, TransferStatus,
};
