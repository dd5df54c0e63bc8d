//! 目录镜像存储后端
//!
//! 参数路径 `/iac/lambda/fn/runtime` 映射为 `<root>/iac/lambda/fn/runtime` 文件，
//! 对象 `s3://bucket/key` 映射为 `<root>/bucket/key` 文件。

use super::{BlobError, BlobStore, ConfigStore, StoreError, StoreValue};
use crate::models::ObjectLocation;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// 将相对路径安全地拼接到根目录下，拒绝 `..` 等越界组件
fn join_under(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative.trim_start_matches('/'));
    let mut joined = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(joined)
}

/// 目录镜像配置存储
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    root: PathBuf,
}

impl FileConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, path: &str) -> Result<StoreValue, StoreError> {
        let file = join_under(&self.root, path)
            .ok_or_else(|| StoreError::AccessDenied(format!("path escapes store root: {}", path)))?;

        match tokio::fs::read_to_string(&file).await {
            Ok(content) => Ok(StoreValue::from_raw(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(StoreError::AccessDenied(file.display().to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

/// 目录镜像对象存储
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, location: &ObjectLocation) -> Result<Bytes, BlobError> {
        let file = join_under(&self.root, &format!("{}/{}", location.bucket, location.key))
            .ok_or_else(|| BlobError::AccessDenied(format!("object escapes store root: {}", location)))?;

        match tokio::fs::read(&file).await {
            Ok(content) => Ok(Bytes::from(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlobError::NotFound),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(BlobError::AccessDenied(file.display().to_string()))
            }
            Err(e) => Err(BlobError::Io(e)),
        }
    }
}
