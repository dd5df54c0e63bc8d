//! 解析错误类型
//!
//! 所有错误都是致命的：这是部署流水线中的一次性步骤，断掉的引用必须让流水线停下来，
//! 不能产出不完整的路由表。

use crate::store::{BlobError, StoreError};
use thiserror::Error;

/// 解析错误
#[derive(Debug, Error)]
pub enum ResolveError {
    /// 输入查询无效
    #[error("invalid resolution query: {0}")]
    InvalidQuery(String),

    /// 配置存储查询失败
    #[error("failed to fetch parameter {path}")]
    StoreLookup {
        path: String,
        #[source]
        source: StoreError,
    },

    /// 对象存储读取失败
    #[error("failed to fetch object {url}")]
    ObjectFetch {
        url: String,
        #[source]
        source: BlobError,
    },

    /// 文档来源描述无效
    #[error("invalid specification source in {path}: {detail}")]
    InvalidSourceDescriptor { path: String, detail: String },

    /// 规范文档无法解析
    #[error("failed to parse specification document: {0}")]
    SpecificationParse(String),

    /// 组件配置缺少规范指针
    #[error("missing spec pointer in {path}: {detail}")]
    MissingSpecPointer { path: String, detail: String },

    /// 后端运行时记录缺少可用标识
    #[error(
        "backend '{nickname}' is missing a valid runtime identifier\n\
         value at {path} = {raw}\n\
         hint: deploy backend '{nickname}' before deploying the API"
    )]
    MissingBackendIdentifier {
        nickname: String,
        path: String,
        raw: String,
    },

    /// 遍历结束但没有解析出任何路由
    #[error("no backend nicknames resolved from specification")]
    NoRoutesResolved,

    /// 结果输出失败
    #[error("failed to write output: {0}")]
    Output(String),
}

impl From<std::io::Error> for ResolveError {
    fn from(err: std::io::Error) -> Self {
        ResolveError::Output(err.to_string())
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        ResolveError::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_store_lookup_keeps_cause() {
        let err = ResolveError::StoreLookup {
            path: "/iac/lambda/fn/runtime".to_string(),
            source: StoreError::NotFound,
        };
        assert_eq!(err.to_string(), "failed to fetch parameter /iac/lambda/fn/runtime");
        assert_eq!(err.source().unwrap().to_string(), "parameter not found");
    }

    #[test]
    fn test_missing_backend_identifier_message() {
        let err = ResolveError::MissingBackendIdentifier {
            nickname: "orders".to_string(),
            path: "/iac/lambda/orders/runtime".to_string(),
            raw: "{}".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("backend 'orders'"));
        assert!(message.contains("/iac/lambda/orders/runtime = {}"));
        assert!(message.contains("hint:"));
    }
}
