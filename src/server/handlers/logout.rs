//! 登出处理器
//!
//! 1. 计算登出后的跳转地址：查询参数 > 全局默认 > 请求自身的主机
//! 2. 清理所有匹配前缀的会话 Cookie（共享域 + 当前主机）
//! 3. 跳转到身份提供方的 `/logout` 端点；debug 模式改为返回诊断文本
//!
//! debug 输出会回显客户端 ID、域名和跳转地址（跳转地址可能来自查询参数），
//! 只以 `text/plain` 返回，不渲染为 HTML。

use crate::config::LogoutConfig;
use crate::server::cookies::{cookies_to_clear, expiry_directives, request_cookie_names};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;

/// 没有任何可用主机信息时的跳转地址
const FALLBACK_REDIRECT: &str = "https://localhost/";

/// `/logout` 查询参数
#[derive(Debug, Default, Deserialize)]
pub struct LogoutQuery {
    /// 显式指定的跳转地址
    pub redirect_uri: Option<String>,
    /// 诊断模式开关
    pub debug: Option<String>,
}

impl LogoutQuery {
    fn is_debug(&self) -> bool {
        matches!(
            self.debug.as_deref().map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("1" | "true" | "yes")
        )
    }
}

/// 计算登出后的跳转地址
pub fn redirect_target(query: &LogoutQuery, config: &LogoutConfig, headers: &HeaderMap) -> String {
    if let Some(uri) = query.redirect_uri.as_deref().filter(|u| !u.trim().is_empty()) {
        return uri.trim().to_string();
    }
    if let Some(uri) = config.default_redirect.as_deref().filter(|u| !u.trim().is_empty()) {
        return uri.trim().to_string();
    }
    headers
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .filter(|host| !host.is_empty())
        .map(|host| format!("https://{}/", host))
        .unwrap_or_else(|| FALLBACK_REDIRECT.to_string())
}

/// 构建身份提供方登出地址
pub fn build_logout_url(config: &LogoutConfig, logout_uri: &str) -> String {
    format!(
        "https://{}/logout?client_id={}&logout_uri={}",
        config.idp_domain,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(logout_uri)
    )
}

/// `GET /logout`
pub async fn logout(
    State(config): State<Arc<LogoutConfig>>,
    Query(query): Query<LogoutQuery>,
    headers: HeaderMap,
) -> Response {
    let target = redirect_target(&query, &config, &headers);
    let logout_url = build_logout_url(&config, &target);

    let names = request_cookie_names(&headers);
    let cleared = cookies_to_clear(&names, &config.cookie_prefixes);

    tracing::info!(
        "[LOGOUT] redirect={} cleared_cookies={} debug={}",
        target,
        cleared.len(),
        query.is_debug()
    );

    let mut response = if query.is_debug() {
        let body = debug_dump(&config, &target, &logout_url, &names, &cleared);
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    } else {
        match HeaderValue::from_str(&logout_url) {
            Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
            Err(e) => {
                tracing::error!("[LOGOUT] 无效的跳转地址 {}: {}", logout_url, e);
                return (StatusCode::BAD_REQUEST, "invalid logout redirect").into_response();
            }
        }
    };

    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    for name in &cleared {
        for directive in expiry_directives(name, config.shared_cookie_domain.as_deref()) {
            match HeaderValue::from_str(&directive) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(e) => tracing::warn!("[LOGOUT] 跳过无法编码的 Cookie {}: {}", name, e),
            }
        }
    }

    response
}

fn debug_dump(
    config: &LogoutConfig,
    target: &str,
    logout_url: &str,
    names: &[String],
    cleared: &[String],
) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "client_id: {}", config.client_id);
    let _ = writeln!(body, "idp_domain: {}", config.idp_domain);
    let _ = writeln!(
        body,
        "shared_cookie_domain: {}",
        config.shared_cookie_domain.as_deref().unwrap_or("-")
    );
    let _ = writeln!(body, "cookie_prefixes: {}", config.cookie_prefixes.join(","));
    let _ = writeln!(body, "redirect_target: {}", target);
    let _ = writeln!(body, "logout_url: {}", logout_url);
    let _ = writeln!(body, "request_cookies: {}", names.join(","));
    let _ = writeln!(body, "cleared_cookies: {}", cleared.join(","));
    body
}
