//! 路由表
//!
//! `"METHOD PATH"` → 后端标识，保持插入顺序。

use indexmap::IndexMap;
use serde::Serialize;

/// 有序路由表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteMap {
    routes: IndexMap<String, String>,
}

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 路由键：方法大写后与路径以单个空格拼接
    pub fn route_key(method: &str, path: &str) -> String {
        format!("{} {}", method.to_uppercase(), path)
    }

    /// 插入路由
    ///
    /// 同一个键再次出现时覆盖旧值（保留首次出现的位置），并返回旧值。
    pub fn insert(&mut self, method: &str, path: &str, identifier: impl Into<String>) -> Option<String> {
        self.routes
            .insert(Self::route_key(method, path), identifier.into())
    }

    pub fn get(&self, route_key: &str) -> Option<&str> {
        self.routes.get(route_key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 序列化为紧凑 JSON 文本
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.routes)
    }
}
