//! 文档来源描述
//!
//! 规范文档可能以三种方式提供：
//! - `"inline"` + `definition` 字段 - 内联文档
//! - 以 `/` 开头的路径 - 存放在配置存储中
//! - 以 `s3://` 开头的 URL - 存放在对象存储中

use crate::resolver::ResolveError;
use crate::store::StoreValue;
use serde_json::Value;
use std::fmt;
use url::Url;

const OBJECT_URL_SCHEME: &str = "s3";
const INLINE_SOURCE: &str = "inline";

/// 对象存储中的位置
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// 解析 `s3://bucket/key`
    pub fn parse(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        if parsed.scheme() != OBJECT_URL_SCHEME {
            return None;
        }
        let bucket = parsed.host_str().filter(|b| !b.is_empty())?;
        let key = parsed.path().trim_start_matches('/');
        if key.is_empty() {
            return None;
        }
        Some(Self::new(bucket, key))
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", OBJECT_URL_SCHEME, self.bucket, self.key)
    }
}

/// 文档来源（每次解析恰好一种）
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDescriptor {
    /// 内联文档
    Inline(Value),
    /// 配置存储路径
    StorePath(String),
    /// 对象存储位置
    ObjectUrl(ObjectLocation),
}

impl SourceDescriptor {
    /// 从规范配置记录推导来源
    ///
    /// `record_path` 仅用于错误信息。
    pub fn from_record(record: &StoreValue, record_path: &str) -> Result<Self, ResolveError> {
        let invalid = |detail: String| ResolveError::InvalidSourceDescriptor {
            path: record_path.to_string(),
            detail,
        };

        let fields = record
            .as_object()
            .ok_or_else(|| invalid(format!("record is not a structured object: {}", record.to_diagnostic_string())))?;

        let source = match fields.get("source") {
            Some(Value::String(source)) => source.as_str(),
            Some(other) => return Err(invalid(format!("source is not a string: {}", other))),
            None => return Err(invalid("record has no source field".to_string())),
        };

        if source.starts_with("s3://") {
            return ObjectLocation::parse(source)
                .map(SourceDescriptor::ObjectUrl)
                .ok_or_else(|| invalid(format!("malformed object URL: {}", source)));
        }

        if source.starts_with('/') {
            return Ok(SourceDescriptor::StorePath(source.to_string()));
        }

        if source == INLINE_SOURCE {
            return match fields.get("definition") {
                Some(definition) if is_present(definition) => {
                    Ok(SourceDescriptor::Inline(definition.clone()))
                }
                _ => Err(invalid("inline source without a definition".to_string())),
            };
        }

        Err(invalid(format!("unrecognized source: {:?}", source)))
    }

    /// 来源类型名（用于日志）
    pub fn kind(&self) -> &'static str {
        match self {
            SourceDescriptor::Inline(_) => "inline",
            SourceDescriptor::StorePath(_) => "store",
            SourceDescriptor::ObjectUrl(_) => "object",
        }
    }
}

/// 内联定义必须非空
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(s) => !s.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}
