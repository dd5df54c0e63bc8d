//! 昵称解析器模块
//!
//! 沿引用链把昵称解析为路由表。
//!
//! # 解析流程
//!
//! 1. 组件配置 (`<base>/<component>/<nickname>/config`) → 规范指针（无组件时跳过，昵称即规范指针）
//! 2. 规范来源记录 (`<base>/openapi/<spec>/runtime`) → 文档来源
//! 3. 读取文档文本 (DocumentSource)
//! 4. 解析文档 (SpecificationParser)
//! 5. 每个带后端昵称扩展的操作 → 后端运行时记录 (`<base>/lambda/<backend>/runtime`) → 标识
//! 6. 路由表为空时失败
//!
//! 所有查询顺序执行，每次查询只尝试一次。

mod document;
mod error;
mod parser;

pub use document::DocumentSource;
pub use error::ResolveError;
pub use parser::SpecificationParser;

use crate::config::ResolverSettings;
use crate::models::{
    ResolutionOutcome, ResolutionQuery, RouteMap, SourceDescriptor, SpecificationDocument,
};
use crate::store::{BlobStore, ConfigStore, StoreValue};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// 参数路径布局
struct ParameterLayout<'a> {
    base_path: &'a str,
    settings: &'a ResolverSettings,
}

impl<'a> ParameterLayout<'a> {
    fn new(base_path: &'a str, settings: &'a ResolverSettings) -> Self {
        Self {
            base_path,
            settings,
        }
    }

    fn component_config(&self, component: &str, nickname: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_path, component, nickname, self.settings.component_record
        )
    }

    fn spec_record(&self, spec_pointer: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_path,
            self.settings.spec_namespace,
            spec_pointer,
            self.settings.spec_record.as_str()
        )
    }

    fn backend_record(&self, backend_nickname: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_path,
            self.settings.backend_namespace,
            backend_nickname,
            self.settings.backend_record
        )
    }
}

/// 昵称解析器
///
/// 存储协作者在构造时注入，测试中可替换为内存实现
pub struct NicknameResolver {
    /// 配置存储
    store: Arc<dyn ConfigStore>,
    /// 文档来源
    documents: DocumentSource,
    /// 规范解析器
    parser: SpecificationParser,
    /// 解析器配置
    settings: ResolverSettings,
}

impl NicknameResolver {
    /// 创建新的解析器
    pub fn new(
        store: Arc<dyn ConfigStore>,
        blobs: Arc<dyn BlobStore>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            documents: DocumentSource::new(store.clone(), blobs),
            parser: SpecificationParser::new(settings.nickname_extensions.clone()),
            store,
            settings,
        }
    }

    /// 使用默认配置创建解析器
    pub fn with_defaults(store: Arc<dyn ConfigStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self::new(store, blobs, ResolverSettings::default())
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// 执行完整的解析流程
    pub async fn resolve(&self, query: &ResolutionQuery) -> Result<ResolutionOutcome, ResolveError> {
        let layout = ParameterLayout::new(&query.base_path, &self.settings);

        // 1. 规范指针
        let spec_pointer = self.resolve_spec_pointer(&layout, query).await?;

        // 2. 文档来源
        let record_path = layout.spec_record(&spec_pointer);
        let record = self.fetch(&record_path).await?;
        let descriptor = SourceDescriptor::from_record(&record, &record_path)?;

        tracing::info!(
            "[RESOLVER] spec={} source={} record={}",
            spec_pointer,
            descriptor.kind(),
            record_path
        );

        // 3. 读取文档
        let specification_text = self.documents.resolve(&descriptor).await?;

        // 4. 解析文档
        let document = self.parser.parse(&specification_text)?;

        // 5-6. 构建路由表
        let route_map = self.build_route_map(&layout, &document).await?;

        tracing::info!(
            "[RESOLVER] spec={} resolved {} route(s)",
            spec_pointer,
            route_map.len()
        );

        Ok(ResolutionOutcome {
            route_map,
            specification_text,
        })
    }

    /// 解析规范指针
    ///
    /// 无组件时直接返回昵称本身
    async fn resolve_spec_pointer(
        &self,
        layout: &ParameterLayout<'_>,
        query: &ResolutionQuery,
    ) -> Result<String, ResolveError> {
        let Some(component) = query.component.as_deref() else {
            return Ok(query.nickname.clone());
        };

        let path = layout.component_config(component, &query.nickname);
        let config = self.fetch(&path).await?;

        let fields = config
            .as_object()
            .ok_or_else(|| ResolveError::MissingSpecPointer {
                path: path.clone(),
                detail: format!(
                    "component config is not a structured record: {}",
                    config.to_diagnostic_string()
                ),
            })?;

        let pointer = self.settings.spec_pointer_fields.iter().find_map(|field| {
            match fields.get(field) {
                Some(Value::String(pointer)) if !pointer.trim().is_empty() => {
                    Some(pointer.trim().to_string())
                }
                _ => None,
            }
        });

        let pointer = pointer.ok_or_else(|| ResolveError::MissingSpecPointer {
            path: path.clone(),
            detail: format!(
                "none of the fields {:?} holds a specification nickname",
                self.settings.spec_pointer_fields
            ),
        })?;

        tracing::debug!(
            "[RESOLVER] component={} nickname={} spec={}",
            component,
            query.nickname,
            pointer
        );
        Ok(pointer)
    }

    /// 构建路由表
    ///
    /// 每个不同的后端昵称只查询一次；路由顺序跟随文档顺序。
    async fn build_route_map(
        &self,
        layout: &ParameterLayout<'_>,
        document: &SpecificationDocument,
    ) -> Result<RouteMap, ResolveError> {
        let mut route_map = RouteMap::new();
        let mut identifiers: HashMap<&str, String> = HashMap::new();

        for (path, method, operation) in document.operations() {
            let Some(nickname) = operation.backend_nickname.as_deref() else {
                tracing::debug!("[RESOLVER] 跳过未声明后端的路由: {} {}", method, path);
                continue;
            };

            let identifier = match identifiers.get(nickname) {
                Some(identifier) => identifier.clone(),
                None => {
                    let identifier = self.resolve_backend(layout, nickname).await?;
                    identifiers.insert(nickname, identifier.clone());
                    identifier
                }
            };

            if let Some(previous) = route_map.insert(method, path, identifier) {
                tracing::warn!(
                    "[RESOLVER] 路由 {} 重复出现，覆盖先前的标识 {}",
                    RouteMap::route_key(method, path),
                    previous
                );
            }
        }

        if route_map.is_empty() {
            return Err(ResolveError::NoRoutesResolved);
        }
        Ok(route_map)
    }

    /// 解析单个后端昵称的标识
    async fn resolve_backend(
        &self,
        layout: &ParameterLayout<'_>,
        nickname: &str,
    ) -> Result<String, ResolveError> {
        let path = layout.backend_record(nickname);
        let record = self.fetch(&path).await?;

        backend_identifier(&record, &self.settings.identifier_field).ok_or_else(|| {
            ResolveError::MissingBackendIdentifier {
                nickname: nickname.to_string(),
                path,
                raw: record.to_diagnostic_string(),
            }
        })
    }

    async fn fetch(&self, path: &str) -> Result<StoreValue, ResolveError> {
        tracing::debug!("[RESOLVER] 查询参数 {}", path);
        self.store
            .get(path)
            .await
            .map_err(|source| ResolveError::StoreLookup {
                path: path.to_string(),
                source,
            })
    }
}

/// 从后端运行时记录中提取标识
///
/// 结构化记录取标识字段，裸字符串直接使用；空字符串不是可用标识。
fn backend_identifier(record: &StoreValue, identifier_field: &str) -> Option<String> {
    let identifier = match record {
        StoreValue::Raw(text) => Some(text.as_str()),
        StoreValue::Structured(Value::String(text)) => Some(text.as_str()),
        StoreValue::Structured(Value::Object(fields)) => {
            fields.get(identifier_field).and_then(Value::as_str)
        }
        StoreValue::Structured(_) => None,
    };
    identifier
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
