//! 外部存储协作者
//!
//! 定义配置存储（按路径取值）与对象存储（按 bucket/key 取字节）两个能力接口，
//! 以及它们的具体后端：
//! - `memory` - 内存存储（测试、快照文件）
//! - `file` - 目录镜像存储
//! - `http` - 基于 reqwest 的远程存储

mod file;
mod http;
mod memory;

pub use file::{FileBlobStore, FileConfigStore};
pub use http::{HttpBlobStore, HttpConfigStore};
pub use memory::{MemoryBlobStore, MemoryConfigStore};

use crate::config::{BlobBackendConfig, StoreBackendConfig};
use crate::models::ObjectLocation;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// 配置存储查询错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 参数不存在
    #[error("parameter not found")]
    NotFound,

    /// 无访问权限
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// 存储不可达
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// 本地 I/O 错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 对象存储读取错误
#[derive(Debug, Error)]
pub enum BlobError {
    /// 对象或 bucket 不存在
    #[error("object not found")]
    NotFound,

    /// 无访问权限
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// 存储不可达
    #[error("object store unavailable: {0}")]
    Unavailable(String),

    /// 对象内容不是合法 UTF-8 文本
    #[error("object is not valid UTF-8: {0}")]
    Decode(String),

    /// 本地 I/O 错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 配置存储返回的值
///
/// 存储中的字符串如果能解析为 JSON 则为结构化值，否则保留原始字符串。
/// 调用方必须同时处理两种情况。
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    /// 可解析为 JSON 的值
    Structured(Value),
    /// 原始字符串
    Raw(String),
}

impl StoreValue {
    /// 从存储中的原始字符串构造
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => StoreValue::Structured(value),
            Err(_) => StoreValue::Raw(raw),
        }
    }

    /// 若为 JSON 对象则返回其字段表
    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        match self {
            StoreValue::Structured(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// 转为文档文本
    ///
    /// 字符串（无论原始还是 JSON 字符串）原样返回，其余结构化值重新序列化为紧凑 JSON。
    pub fn into_text(self) -> String {
        match self {
            StoreValue::Raw(text) => text,
            StoreValue::Structured(Value::String(text)) => text,
            StoreValue::Structured(value) => value.to_string(),
        }
    }

    /// 用于错误诊断的可读形式
    pub fn to_diagnostic_string(&self) -> String {
        match self {
            StoreValue::Raw(text) => format!("{:?}", text),
            StoreValue::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// 配置存储能力
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// 后端名称（用于日志）
    fn name(&self) -> &str;

    /// 按路径读取一个参数，单次尝试，不重试
    async fn get(&self, path: &str) -> Result<StoreValue, StoreError>;
}

/// 对象存储能力
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// 后端名称（用于日志）
    fn name(&self) -> &str;

    /// 读取对象的全部字节，单次尝试，不重试
    async fn get(&self, location: &ObjectLocation) -> Result<Bytes, BlobError>;
}

/// 根据配置创建配置存储后端
pub fn build_config_store(config: &StoreBackendConfig) -> Result<Arc<dyn ConfigStore>, StoreError> {
    let store: Arc<dyn ConfigStore> = match config {
        StoreBackendConfig::File { root } => Arc::new(FileConfigStore::new(root)),
        StoreBackendConfig::Snapshot { path } => Arc::new(MemoryConfigStore::from_snapshot_file(path)?),
        StoreBackendConfig::Http { endpoint, token } => {
            Arc::new(HttpConfigStore::new(endpoint, token.clone())?)
        }
    };
    tracing::debug!("[STORE] 使用配置存储后端: {}", store.name());
    Ok(store)
}

/// 根据配置创建对象存储后端
pub fn build_blob_store(config: &BlobBackendConfig) -> Result<Arc<dyn BlobStore>, BlobError> {
    let store: Arc<dyn BlobStore> = match config {
        BlobBackendConfig::File { root } => Arc::new(FileBlobStore::new(root)),
        BlobBackendConfig::Http { endpoint } => Arc::new(HttpBlobStore::new(endpoint)?),
    };
    tracing::debug!("[STORE] 使用对象存储后端: {}", store.name());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_parses_json_object() {
        let value = StoreValue::from_raw(r#"{"arn": "arn:aws:lambda:fn"}"#);
        assert_eq!(value, StoreValue::Structured(json!({"arn": "arn:aws:lambda:fn"})));
        assert!(value.as_object().is_some());
    }

    #[test]
    fn test_from_raw_keeps_plain_string() {
        let value = StoreValue::from_raw("arn:aws:lambda:us-east-1:123:function:fn");
        assert_eq!(
            value,
            StoreValue::Raw("arn:aws:lambda:us-east-1:123:function:fn".to_string())
        );
        assert!(value.as_object().is_none());
    }

    #[test]
    fn test_into_text_keeps_strings_verbatim() {
        let yaml = "openapi: 3.0.0\npaths: {}\n";
        assert_eq!(StoreValue::from_raw(yaml).into_text(), yaml);

        // JSON 字符串按原样返回内部文本
        assert_eq!(StoreValue::from_raw(r#""hello""#).into_text(), "hello");
    }

    #[test]
    fn test_into_text_preserves_key_order() {
        let value = StoreValue::from_raw(r#"{"paths": {"/b": {}, "/a": {}}}"#);
        assert_eq!(value.into_text(), r#"{"paths":{"/b":{},"/a":{}}}"#);
    }
}
