//! HTTP 处理器

mod logout;

pub use logout::{build_logout_url, logout, redirect_target, LogoutQuery};

/// 健康检查
pub async fn healthz() -> &'static str {
    "ok"
}
