/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config 読み込み → 依存生成 (PgAccountStore, TokenService) → Router 組み立て
 * - HTTP middleware の適用
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware::http::{self, HttpLimits},
    repos::account_repo::PgAccountStore,
    services::auth::build_token_service,
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,account_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched.
        tracing::error!(?info, "panic");

        // development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting account API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let store = PgAccountStore::connect(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;
    store
        .init()
        .await
        .context("failed to create account table")?;

    let tokens = build_token_service(config);

    Ok(AppState::new(Arc::new(store), tokens))
}

fn build_router(state: AppState, config: &Config) -> Router {
    http::apply(
        api::routes(state),
        HttpLimits {
            body_limit_bytes: config.request_body_limit_bytes,
            timeout: config.request_timeout,
        },
    )
}
