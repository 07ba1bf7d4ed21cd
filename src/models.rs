// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Shared API Types
//!
//! The [`WalletAddress`] newtype wraps wallet identifiers (for login these
//! are Ethereum-style 0x-addresses; game wallet ids are free-form strings).
//! Request/response DTOs live next to their handlers in the `api` module.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wallet identifier wrapper.
///
/// Provides type safety for wallet ids throughout the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
