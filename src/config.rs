// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the embedded database | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HS256 secret for session tokens | dev fallback (warned) |
//! | `JWT_EXPIRES_IN` | Session token lifetime in seconds | `31536000` |
//! | `WITHDRAW_FEE` | Withdrawal fee percent, charged on top | `5` |
//! | `CLAIM_FEE` | Claim fee percent, subtracted | falls back to `WITHDRAW_FEE` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

const DEV_JWT_SECRET: &str = "insecure-dev-secret";

/// Configuration knobs consumed by the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expires_in: i64,
    /// Withdrawal fee percent; charged on top of the payout.
    pub withdraw_fee_percent: f64,
    /// Claim fee percent; subtracted from the claimed amount.
    pub claim_fee_percent: f64,
}

impl AppConfig {
    /// Load configuration from the environment, applying defaults.
    pub fn from_env() -> Self {
        let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string());
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8080);

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set; using the development fallback secret");
            DEV_JWT_SECRET.to_string()
        });
        let jwt_expires_in = env::var("JWT_EXPIRES_IN")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(31_536_000);

        let withdraw_fee_percent = env::var("WITHDRAW_FEE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(5.0);
        // CLAIM_FEE falls back to the withdraw fee; deployments that never
        // set it get the historical single-knob behavior.
        let claim_fee_percent = env::var("CLAIM_FEE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(withdraw_fee_percent);

        Self {
            data_dir: PathBuf::from(data_dir),
            host,
            port,
            jwt_secret,
            jwt_expires_in,
            withdraw_fee_percent,
            claim_fee_percent,
        }
    }

    /// Path of the embedded database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("economy.redb")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_is_under_the_data_dir() {
        let config = AppConfig {
            data_dir: PathBuf::from("/tmp/arena"),
            host: "127.0.0.1".to_string(),
            port: 8080,
            jwt_secret: "s".to_string(),
            jwt_expires_in: 60,
            withdraw_fee_percent: 5.0,
            claim_fee_percent: 5.0,
        };
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/arena/economy.redb")
        );
    }
}
