// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{IntoParams, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::WalletAddress,
    state::AppState,
    storage::{
        ClaimStatus, StoredClaim, StoredDeposit, StoredHistory, StoredPlayer, StoredReward,
        StoredTurn, StoredUser, StoredWithdrawal, TransferStatus,
    },
};

pub mod auth;
pub mod claims;
pub mod deposits;
pub mod health;
pub mod history;
pub mod players;
pub mod rewards;
pub mod transactions;
pub mod turns;
pub mod withdrawals;

/// Shared limit/skip pagination query.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Maximum number of results (default: 50).
    #[param(default = 50)]
    pub limit: Option<usize>,
    /// Number of results to skip (default: 0).
    #[param(default = 0)]
    pub skip: Option<usize>,
}

impl PageQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(50)
    }

    pub fn skip(&self) -> usize {
        self.skip.unwrap_or(0)
    }
}

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/check", get(auth::check))
        .route("/players", post(players::create_player))
        .route("/players/random", post(players::random_player))
        .route("/players/{player_id}", get(players::get_player))
        .route("/players/{player_id}/boot-mana", post(players::boot_mana))
        .route("/players/{player_id}/boot-hp", post(players::boot_hp))
        .route("/rewards/{wallet_id}", get(rewards::list_rewards))
        .route("/deposit", post(deposits::create_deposit))
        .route("/deposit/{wallet_id}", get(deposits::list_deposits))
        .route("/withdraw", post(withdrawals::create_withdrawal))
        .route("/withdraw/{wallet_id}", get(withdrawals::list_withdrawals))
        .route("/claims", post(claims::create_claim))
        .route(
            "/claims/{id}",
            get(claims::list_claims).put(claims::update_claim),
        )
        .route("/play-history", post(history::create_history))
        .route("/play-history/top-rewards", get(history::top_rewards))
        .route("/play-history/{wallet_id}", get(history::list_history))
        .route(
            "/play-history/{wallet_id}/daily",
            get(history::daily_history),
        )
        .route(
            "/turns/{wallet_id}/{player_id}",
            get(turns::get_turn).put(turns::update_turn),
        )
        .route(
            "/transactions-history",
            get(transactions::transactions_history),
        )
        .with_state(state);

    Router::new()
        .route("/health-check", get(health::health_check))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::check,
        players::create_player,
        players::get_player,
        players::boot_mana,
        players::boot_hp,
        players::random_player,
        rewards::list_rewards,
        deposits::create_deposit,
        deposits::list_deposits,
        withdrawals::create_withdrawal,
        withdrawals::list_withdrawals,
        claims::create_claim,
        claims::update_claim,
        claims::list_claims,
        history::create_history,
        history::list_history,
        history::top_rewards,
        history::daily_history,
        turns::get_turn,
        turns::update_turn,
        transactions::transactions_history,
        health::health_check
    ),
    components(
        schemas(
            WalletAddress,
            StoredUser,
            StoredPlayer,
            StoredReward,
            StoredDeposit,
            StoredWithdrawal,
            StoredClaim,
            StoredHistory,
            StoredTurn,
            TransferStatus,
            ClaimStatus,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserResponse,
            auth::CheckResponse,
            players::CreatePlayerRequest,
            players::BootHpRequest,
            players::RandomPlayerRequest,
            players::RandomPlayerResponse,
            deposits::CreateDepositRequest,
            withdrawals::CreateWithdrawRequest,
            claims::CreateClaimRequest,
            claims::UpdateClaimRequest,
            history::CreateHistoryRequest,
            history::CreateHistoryResponse,
            history::TopRewardRow,
            history::DailyHistoryResponse,
            turns::UpdateTurnRequest,
            transactions::TransactionsHistoryResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Wallet-signature login"),
        (name = "Players", description = "Player records and resources"),
        (name = "Rewards", description = "Reward ledger reads"),
        (name = "Deposits", description = "Ledger credits"),
        (name = "Withdrawals", description = "Ledger debits"),
        (name = "Claims", description = "Off-system payout claims"),
        (name = "Play History", description = "Session records and aggregations"),
        (name = "Turns", description = "Daily turn allowances"),
        (name = "Transactions", description = "Combined event history"),
        (name = "Health", description = "Liveness")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::EconomyDb;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let dir = tempfile::tempdir().unwrap();
        let db = EconomyDb::open(&dir.path().join("economy.redb")).unwrap();
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in: 3600,
            withdraw_fee_percent: 5.0,
            claim_fee_percent: 5.0,
        };
        let app = router(AppState::new(db, config));
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
