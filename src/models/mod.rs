//! 数据模型模块
//!
//! 解析查询、文档来源、规范文档与最终路由表。

mod query;
mod route_map;
mod source;
mod specification;

pub use query::ResolutionQuery;
pub use route_map::RouteMap;
pub use source::{ObjectLocation, SourceDescriptor};
pub use specification::{Operation, SpecificationDocument};

/// 一次解析的完整结果
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionOutcome {
    /// 路由表
    pub route_map: RouteMap,
    /// 规范文档原始文本
    pub specification_text: String,
}
