//! 登出 HTTP 服务
//!
//! 负载均衡器在身份提供方认证后会写入会话 Cookie，
//! 本服务负责清理这些 Cookie 并把用户送往身份提供方的登出端点。

pub mod cookies;
pub mod handlers;

use crate::config::LogoutConfig;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 构建登出服务路由
pub fn build_router(config: LogoutConfig) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/logout", get(handlers::logout))
        .with_state(Arc::new(config))
        .layer(TraceLayer::new_for_http())
}

/// 启动登出服务，直到进程退出
pub async fn serve(addr: SocketAddr, config: LogoutConfig) -> anyhow::Result<()> {
    tracing::info!(
        "[SERVER] 登出服务监听 {} (idp_domain={}, prefixes={:?})",
        addr,
        config.idp_domain,
        config.cookie_prefixes
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router(config)).await?;
    Ok(())
}
