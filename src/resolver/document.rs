//! 文档来源抽象
//!
//! 无论文档是内联、存放在配置存储还是对象存储中，都返回其原始文本。

use super::ResolveError;
use crate::models::SourceDescriptor;
use crate::store::{BlobError, BlobStore, ConfigStore};
use serde_json::Value;
use std::sync::Arc;

/// 文档来源
#[derive(Clone)]
pub struct DocumentSource {
    store: Arc<dyn ConfigStore>,
    blobs: Arc<dyn BlobStore>,
}

impl DocumentSource {
    pub fn new(store: Arc<dyn ConfigStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// 读取文档原始文本
    pub async fn resolve(&self, descriptor: &SourceDescriptor) -> Result<String, ResolveError> {
        tracing::debug!("[DOCUMENT] 读取 {} 来源的规范文档", descriptor.kind());

        match descriptor {
            SourceDescriptor::Inline(Value::String(text)) => Ok(text.clone()),
            SourceDescriptor::Inline(document) => Ok(document.to_string()),
            SourceDescriptor::StorePath(path) => {
                let value = self
                    .store
                    .get(path)
                    .await
                    .map_err(|source| ResolveError::StoreLookup {
                        path: path.clone(),
                        source,
                    })?;
                Ok(value.into_text())
            }
            SourceDescriptor::ObjectUrl(location) => {
                let url = location.to_string();
                let bytes = self
                    .blobs
                    .get(location)
                    .await
                    .map_err(|source| ResolveError::ObjectFetch {
                        url: url.clone(),
                        source,
                    })?;
                String::from_utf8(bytes.to_vec()).map_err(|e| ResolveError::ObjectFetch {
                    url,
                    source: BlobError::Decode(e.to_string()),
                })
            }
        }
    }
}
