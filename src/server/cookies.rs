//! Cookie 清理工具
//!
//! 解析请求 Cookie 头，并为需要清理的 Cookie 生成过期指令。

use axum::http::{header, HeaderMap};

/// 过期时间（Unix 纪元）
const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// 读取请求中所有 Cookie 的名称（按出现顺序，去重）
pub fn request_cookie_names(headers: &HeaderMap) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let name = pair.split('=').next().unwrap_or_default().trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// 选出名称匹配任一前缀的 Cookie
pub fn cookies_to_clear(names: &[String], prefixes: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| prefixes.iter().any(|prefix| name.starts_with(prefix.as_str())))
        .cloned()
        .collect()
}

/// 生成一条过期 `Set-Cookie` 指令
///
/// `domain` 为空时生成仅限当前主机的指令
pub fn expire_cookie(name: &str, domain: Option<&str>) -> String {
    let mut cookie = format!(
        "{}=; Max-Age=0; Expires={}; Path=/; Secure; HttpOnly",
        name, EPOCH_EXPIRES
    );
    if let Some(domain) = domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    cookie
}

/// 为一个 Cookie 生成全部过期指令：共享域（如已配置）+ 当前主机
pub fn expiry_directives(name: &str, shared_domain: Option<&str>) -> Vec<String> {
    let mut directives = Vec::with_capacity(2);
    if let Some(domain) = shared_domain.filter(|d| !d.is_empty()) {
        directives.push(expire_cookie(name, Some(domain)));
    }
    directives.push(expire_cookie(name, None));
    directives
}
