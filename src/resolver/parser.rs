//! 规范文档解析
//!
//! 文档按 YAML（JSON 的超集）解析，只提取
//! `paths.<path>.<method>[<扩展字段>]`，不做完整 schema 校验。

use super::ResolveError;
use crate::models::{Operation, SpecificationDocument};
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

/// 规范文档解析器
#[derive(Debug, Clone)]
pub struct SpecificationParser {
    /// 后端昵称扩展字段名，按优先级排列
    extensions: Vec<String>,
}

impl SpecificationParser {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// 解析文档文本
    pub fn parse(&self, text: &str) -> Result<SpecificationDocument, ResolveError> {
        let mut root: Value = serde_yaml::from_str(text)
            .map_err(|e| ResolveError::SpecificationParse(e.to_string()))?;
        // 展开 `<<: *anchor` 合并键
        root.apply_merge()
            .map_err(|e| ResolveError::SpecificationParse(e.to_string()))?;

        let root = match root {
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(ResolveError::SpecificationParse(format!(
                    "document root is not a mapping (found {})",
                    value_kind(&other)
                )))
            }
        };

        let mut document = SpecificationDocument::new();
        let paths = match root.get("paths") {
            None | Some(Value::Null) => return Ok(document),
            Some(Value::Mapping(paths)) => paths,
            Some(other) => {
                return Err(ResolveError::SpecificationParse(format!(
                    "paths is not a mapping (found {})",
                    value_kind(other)
                )))
            }
        };

        for (path, item) in paths {
            let Some(path) = path.as_str() else {
                tracing::debug!("[PARSER] 跳过非字符串路径键: {:?}", path);
                continue;
            };
            let Value::Mapping(item) = item else {
                continue;
            };

            let methods = document.paths.entry(path.to_string()).or_default();
            for (method, operation) in self.operations(item) {
                methods.insert(method, operation);
            }
        }

        Ok(document)
    }

    /// 提取一个路径项下的所有操作
    ///
    /// 非映射的条目（`parameters`、`summary` 等）不是操作，直接跳过。
    fn operations(&self, item: &Mapping) -> IndexMap<String, Operation> {
        let mut operations = IndexMap::new();
        for (method, operation) in item {
            let (Some(method), Value::Mapping(operation)) = (method.as_str(), operation) else {
                continue;
            };
            let method = method.to_uppercase();
            let operation = Operation {
                backend_nickname: self.backend_nickname(operation),
            };
            if operations.insert(method.clone(), operation).is_some() {
                tracing::warn!("[PARSER] 方法 {} 重复声明，后出现的定义覆盖先前定义", method);
            }
        }
        operations
    }

    fn backend_nickname(&self, operation: &Mapping) -> Option<String> {
        self.extensions.iter().find_map(|field| match operation.get(field.as_str()) {
            Some(Value::String(nickname)) if !nickname.trim().is_empty() => {
                Some(nickname.trim().to_string())
            }
            _ => None,
        })
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> SpecificationParser {
        SpecificationParser::new(vec![
            "x-backend-nickname".to_string(),
            "x-lambda-nickname".to_string(),
        ])
    }

    #[test]
    fn test_parse_yaml_document() {
        let text = r#"
openapi: 3.0.1
info:
  title: Shop
paths:
  /orders:
    parameters:
      - name: tenant
        in: header
    get:
      x-backend-nickname: list-orders
    post:
      x-lambda-nickname: create-order
  /health:
    get:
      summary: no backend
"#;
        let document = parser().parse(text).unwrap();
        let ops: Vec<(&str, &str, Option<&str>)> = document
            .operations()
            .map(|(path, method, op)| (path, method, op.backend_nickname.as_deref()))
            .collect();

        assert_eq!(
            ops,
            vec![
                ("/orders", "GET", Some("list-orders")),
                ("/orders", "POST", Some("create-order")),
                ("/health", "GET", None),
            ]
        );
        assert_eq!(document.managed_operation_count(), 2);
    }

    #[test]
    fn test_parse_json_document() {
        let text = r#"{"paths":{"/b":{"GET":{"x-backend-nickname":"fn2"}},"/a":{"get":{"x-backend-nickname":"fn1"}}}}"#;
        let document = parser().parse(text).unwrap();
        let paths: Vec<&String> = document.paths.keys().collect();
        assert_eq!(paths, vec!["/b", "/a"]);
        assert!(document.paths["/b"].contains_key("GET"));
    }

    #[test]
    fn test_extension_priority_and_blank_values() {
        let text = r#"
paths:
  /a:
    get:
      x-backend-nickname: primary
      x-lambda-nickname: legacy
    put:
      x-backend-nickname: ""
    delete:
      x-backend-nickname: 42
"#;
        let document = parser().parse(text).unwrap();
        let methods = &document.paths["/a"];
        assert_eq!(methods["GET"].backend_nickname.as_deref(), Some("primary"));
        assert_eq!(methods["PUT"].backend_nickname, None);
        assert_eq!(methods["DELETE"].backend_nickname, None);
    }

    #[test]
    fn test_method_case_collision_last_write_wins() {
        let text = r#"
paths:
  /a:
    get:
      x-backend-nickname: first
    post:
      x-backend-nickname: other
    GET:
      x-backend-nickname: second
"#;
        let document = parser().parse(text).unwrap();
        let methods: Vec<(&String, Option<&str>)> = document.paths["/a"]
            .iter()
            .map(|(m, op)| (m, op.backend_nickname.as_deref()))
            .collect();
        assert_eq!(
            methods,
            vec![
                (&"GET".to_string(), Some("second")),
                (&"POST".to_string(), Some("other")),
            ]
        );
    }

    #[test]
    fn test_merge_keys_are_applied() {
        let text = r#"
x-common: &common
  x-backend-nickname: fn1
x-item: &item
  delete:
    x-backend-nickname: fn3
paths:
  /a:
    get:
      <<: *common
      summary: s
  /b:
    <<: *item
    post:
      <<: *common
      x-backend-nickname: fn2
"#;
        let document = parser().parse(text).unwrap();
        let ops: Vec<(&str, &str, Option<&str>)> = document
            .operations()
            .map(|(path, method, op)| (path, method, op.backend_nickname.as_deref()))
            .collect();

        assert_eq!(
            ops,
            vec![
                ("/a", "GET", Some("fn1")),
                ("/b", "POST", Some("fn2")),
                ("/b", "DELETE", Some("fn3")),
            ]
        );
        assert!(!document.paths["/b"].contains_key("<<"));
    }

    #[test]
    fn test_missing_paths_is_empty_document() {
        let document = parser().parse("openapi: 3.0.0\n").unwrap();
        assert!(document.paths.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        for text in ["paths: [unclosed", "just a string", "paths: [1, 2]", ""] {
            assert!(
                matches!(parser().parse(text), Err(ResolveError::SpecificationParse(_))),
                "expected parse error for {:?}",
                text
            );
        }
    }
}
