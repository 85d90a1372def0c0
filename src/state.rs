/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - store: AccountStore (本番は PgAccountStore、テストは MemoryAccountStore)
 *   - tokens: TokenService (署名鍵は Config から注入)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::repos::account_repo::AccountStore;
use crate::services::auth::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn AccountStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }
}
