//! 内存存储后端
//!
//! 用于测试替身，也可从 YAML/JSON 快照文件加载整棵参数树。

use super::{BlobError, BlobStore, ConfigStore, StoreError, StoreValue};
use crate::models::ObjectLocation;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 内存配置存储
///
/// 值以存储中的原始字符串形式保存，读取时再按 JSON 尝试解析，
/// 与远程参数存储的行为一致。
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: HashMap<String, String>,
    denied: Vec<String>,
    lookups: AtomicUsize,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一个原始字符串参数
    pub fn with_value(mut self, path: impl Into<String>, raw: impl Into<String>) -> Self {
        self.insert(path, raw);
        self
    }

    /// 写入一个结构化参数（以 JSON 文本存储）
    pub fn with_json(mut self, path: impl Into<String>, value: serde_json::Value) -> Self {
        self.insert(path, value.to_string());
        self
    }

    /// 标记某个路径为无权限访问
    pub fn with_denied(mut self, path: impl Into<String>) -> Self {
        self.denied.push(path.into());
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, raw: impl Into<String>) {
        self.values.insert(path.into(), raw.into());
    }

    /// 已执行的查询次数
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// 从快照文件加载
    ///
    /// 快照是一个 `路径 -> 值` 的映射；字符串值原样保存，
    /// 其他值按 JSON 文本保存。
    pub fn from_snapshot_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_snapshot_str(&content)
    }

    pub fn from_snapshot_str(content: &str) -> Result<Self, StoreError> {
        let entries: HashMap<String, serde_yaml::Value> = serde_yaml::from_str(content)
            .map_err(|e| StoreError::Unavailable(format!("invalid snapshot: {}", e)))?;

        let mut store = Self::new();
        for (path, value) in entries {
            let raw = match value {
                serde_yaml::Value::String(text) => text,
                other => serde_json::to_string(&other)
                    .map_err(|e| StoreError::Unavailable(format!("invalid snapshot value: {}", e)))?,
            };
            store.insert(path, raw);
        }
        Ok(store)
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, path: &str) -> Result<StoreValue, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.denied.iter().any(|denied| denied == path) {
            return Err(StoreError::AccessDenied(path.to_string()));
        }

        self.values
            .get(path)
            .map(|raw| StoreValue::from_raw(raw.as_str()))
            .ok_or(StoreError::NotFound)
    }
}

/// 内存对象存储
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: HashMap<(String, String), Bytes>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(
        mut self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Self {
        self.objects.insert((bucket.into(), key.into()), body.into());
        self
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, location: &ObjectLocation) -> Result<Bytes, BlobError> {
        self.objects
            .get(&(location.bucket.clone(), location.key.clone()))
            .cloned()
            .ok_or(BlobError::NotFound)
    }
}
