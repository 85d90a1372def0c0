//! account token (HMAC JWT) の検証 → path の口座と token の口座番号を突き合わせる
//!
//! 順序:
//! 1. `x-jwt-token` ヘッダから token を取り出す (無ければ 401)
//! 2. 署名 + アルゴリズム (HMAC 系のみ) を検証 (失敗は 401 "permission denied")
//! 3. path の `{id}` を数値として読む (失敗は 401、storage には触れない)
//! 4. storage で口座を引く (失敗は 401)
//! 5. claim の accountNumber と口座の number を比較 (不一致は 401 "invalid token")
//!
//! 失敗理由はクライアントに返さず、warn ログにだけ残す。

use axum::{
    body::Body,
    extract::{Path, State, rejection::PathRejection},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::ApiError;
use crate::state::AppState;

pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Wrap a single route with the account gate.
///
/// ```ignore
/// .route("/account/{id}", account_gate::guard(get(get_account_by_id), state.clone()))
/// ```
pub fn guard(route: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state, account_gate))
}

async fn account_gate(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("account token missing or not valid ascii");
        return Err(ApiError::PermissionDenied);
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = ?err, "account token verification failed");
            return Err(ApiError::PermissionDenied);
        }
    };

    let id = match path {
        Ok(Path(raw)) => match raw.parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!(raw_id = %raw, "non-numeric account id on guarded route");
                return Err(ApiError::PermissionDenied);
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "account id missing on guarded route");
            return Err(ApiError::PermissionDenied);
        }
    };

    let account = match state.store.get_account_by_id(id).await {
        Ok(account) => account,
        Err(err) => {
            tracing::warn!(id, error = %err, "account lookup failed during authorization");
            return Err(ApiError::PermissionDenied);
        }
    };

    if account.number != claims.account_number {
        tracing::warn!(
            id,
            claimed = claims.account_number,
            "account number in token does not match target account"
        );
        return Err(ApiError::InvalidToken);
    }

    Ok(next.run(req).await)
}
