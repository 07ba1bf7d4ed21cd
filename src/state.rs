// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::EconomyDb;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<EconomyDb>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: EconomyDb, config: AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}
