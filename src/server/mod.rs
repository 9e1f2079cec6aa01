//! 比較プロキシのHTTPサーバ
//!
//! ブラウザから受けた2ファイルをバックエンドへ転送し、
//! 返ってきたExcelをそのまま返す。

mod handlers;

use crate::client::ReqwestTransport;
use crate::config::Config;
use crate::error::{CompareError, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use skv_compare_common::validation::MAX_SIZE_BYTES;
use skv_compare_common::RetryOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 2ファイル + multipartのオーバーヘッド
pub const MAX_UPLOAD_BYTES: usize = (2 * MAX_SIZE_BYTES + 1024 * 1024) as usize;

/// ハンドラ共有の状態
#[derive(Clone)]
pub struct AppContext {
    pub transport: ReqwestTransport,
    pub backend_url: String,
    pub retry: RetryOptions,
}

impl AppContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            transport: ReqwestTransport::new(),
            backend_url: config.backend_url.clone(),
            retry: config.retry_options(),
        }
    }
}

/// ルーティング
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/api/compare", post(handlers::compare))
        .route("/health", get(handlers::health))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// サーバを起動（終了まで戻らない）
pub async fn run(config: &Config) -> Result<()> {
    let app = router(AppContext::from_config(config));

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|e| CompareError::Server(format!("Failed to bind to {}: {}", config.bind, e)))?;
    info!(bind = %config.bind, backend = %config.backend_url, "starting comparison proxy");

    axum::serve(listener, app)
        .await
        .map_err(|e| CompareError::Server(e.to_string()))?;

    Ok(())
}
