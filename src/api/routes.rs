/*
 * Responsibility
 * - URL 構造を定義
 * - /account/{id} だけに account gate を route_layer で掛ける
 * - /account と /delete-account/{id} は any() で受けて handler 側で method を判定する
 * - /accounts と /account/{id} の未対応 method は fallback で 400 envelope (gate は通さない)
 */
use axum::{
    Router,
    routing::{any, get},
};

use crate::middleware::auth::account_gate;
use crate::state::AppState;

use crate::api::handlers::{
    accounts::{
        delete_account, get_account_by_id, handle_account, list_accounts, unsupported_method,
    },
    health::health,
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/account", any(handle_account))
        .route("/accounts", get(list_accounts).fallback(unsupported_method))
        .route(
            "/account/{id}",
            account_gate::guard(
                get(get_account_by_id).fallback(unsupported_method),
                state.clone(),
            ),
        )
        .route("/delete-account/{id}", any(delete_account))
        .with_state(state)
}
