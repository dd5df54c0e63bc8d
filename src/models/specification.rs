//! 规范文档模型
//!
//! 只保留解析路由所需的信息：路径 → 方法（大写） → 操作。

use indexmap::IndexMap;

/// 单个操作
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operation {
    /// 后端昵称扩展字段
    pub backend_nickname: Option<String>,
}

/// 规范文档
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecificationDocument {
    /// 路径 → 方法 → 操作，保持文档顺序
    pub paths: IndexMap<String, IndexMap<String, Operation>>,
}

impl SpecificationDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按文档顺序遍历 `(path, method, operation)`
    pub fn operations(&self) -> impl Iterator<Item = (&str, &str, &Operation)> {
        self.paths.iter().flat_map(|(path, methods)| {
            methods
                .iter()
                .map(move |(method, operation)| (path.as_str(), method.as_str(), operation))
        })
    }

    /// 声明了后端昵称的操作数
    pub fn managed_operation_count(&self) -> usize {
        self.operations()
            .filter(|(_, _, op)| op.backend_nickname.is_some())
            .count()
    }
}
