/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 口座 token の gate (単一ルートにだけ掛ける)
 * - http: 全ルート共通の横断的関心事 (request id, trace, limit, timeout)
 */
pub mod auth;
pub mod http;
