/*
 * Responsibility
 * - /account, /accounts, /account/{id}, /delete-account/{id} の handler
 * - 失敗は ApiError で返し、envelope への変換は error.rs に任せる
 * - /account と /delete-account は method を自前で振り分ける (未対応 method は 400)
 * - get() だけの route は unsupported_method を fallback にして同じ 400 を返す
 */
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    api::dto::accounts::{AccountResponse, CreateAccountRequest},
    error::ApiError,
    middleware::auth::account_gate::TOKEN_HEADER,
    repos::{account_repo::NewAccount, error::RepoError},
    state::AppState,
};

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// `GET|POST /account`
pub async fn handle_account(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Response, ApiError> {
    match method {
        Method::GET => Ok(list_accounts(State(state)).await?.into_response()),
        Method::POST => create_account(&state, &body).await,
        other => Err(ApiError::UnsupportedMethod(other)),
    }
}

/// Method fallback for the GET-only routes.
pub async fn unsupported_method(method: Method) -> ApiError {
    ApiError::UnsupportedMethod(method)
}

/// `GET /accounts`
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let rows = state.store.get_accounts().await?;
    Ok(Json(rows.into_iter().map(AccountResponse::from).collect()))
}

async fn create_account(state: &AppState, body: &[u8]) -> Result<Response, ApiError> {
    let req: CreateAccountRequest =
        serde_json::from_slice(body).map_err(|e| ApiError::bad_request(e.to_string()))?;
    req.validate().map_err(ApiError::bad_request)?;

    let account = state
        .store
        .create_account(NewAccount {
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    let token = state.tokens.issue(&account)?;
    tracing::debug!(id = account.id, number = account.number, token = %token, "issued account token");

    Ok((
        StatusCode::OK,
        [(TOKEN_HEADER, token)],
        Json(AccountResponse::from(account)),
    )
        .into_response())
}

/// `GET /account/{id}`, behind the account gate.
pub async fn get_account_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    let account = state.store.get_account_by_id(id).await?;
    Ok(Json(account.into()))
}

/// `DELETE /delete-account/{id}`
///
/// Responds with the account as it was before deletion, or `null` when the
/// pre-deletion lookup failed. Deleting an id that is already gone is not an
/// error.
pub async fn delete_account(
    State(state): State<AppState>,
    method: Method,
    Path(raw_id): Path<String>,
) -> Result<Json<Option<AccountResponse>>, ApiError> {
    if method != Method::DELETE {
        return Err(ApiError::UnsupportedMethod(method));
    }
    let id = parse_id(&raw_id)?;

    let snapshot = state.store.get_account_by_id(id).await.ok();

    match state.store.delete_account(id).await {
        Ok(()) => {}
        Err(RepoError::NotFound { .. }) => {
            tracing::debug!(id, "delete of missing account");
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "failed to delete account");
            return Err(ApiError::bad_request(format!("error deleting account: {e}")));
        }
    }

    Ok(Json(snapshot.map(AccountResponse::from)))
}
