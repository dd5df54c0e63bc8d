//! 解析查询
//!
//! 从标准输入读取的 `{ base_path, component?, nickname }` 对象。

use crate::resolver::ResolveError;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RawQuery {
    #[serde(alias = "iac_base")]
    base_path: String,
    #[serde(default)]
    component: Option<String>,
    nickname: String,
}

/// 解析查询（构造后不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionQuery {
    /// 参数层级根路径，如 `/iac`
    pub base_path: String,
    /// 组件名；为空时直接把 nickname 当作规范昵称
    pub component: Option<String>,
    /// 昵称
    pub nickname: String,
}

impl ResolutionQuery {
    pub fn new(
        base_path: impl Into<String>,
        component: Option<String>,
        nickname: impl Into<String>,
    ) -> Result<Self, ResolveError> {
        let base_path = base_path.into();
        let base_path = base_path.trim().trim_end_matches('/').to_string();
        let nickname = nickname.into().trim().to_string();
        let component = component
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        if base_path.is_empty() {
            return Err(ResolveError::InvalidQuery("base_path is empty".to_string()));
        }
        if nickname.is_empty() {
            return Err(ResolveError::InvalidQuery("nickname is empty".to_string()));
        }

        Ok(Self {
            base_path,
            component,
            nickname,
        })
    }

    /// 从 JSON 文本解析
    pub fn from_json(text: &str) -> Result<Self, ResolveError> {
        let raw: RawQuery =
            serde_json::from_str(text).map_err(|e| ResolveError::InvalidQuery(e.to_string()))?;
        Self::new(raw.base_path, raw.component, raw.nickname)
    }

    /// 从输入流读取一次完整的 JSON 查询
    pub fn from_reader(mut reader: impl Read) -> Result<Self, ResolveError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| ResolveError::InvalidQuery(format!("failed to read input: {}", e)))?;
        Self::from_json(&text)
    }

    /// 是否经过组件配置间接寻址
    pub fn has_component(&self) -> bool {
        self.component.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_component_query() {
        let query =
            ResolutionQuery::from_json(r#"{"base_path": "/iac/", "component": "api", "nickname": "shop"}"#)
                .unwrap();
        assert_eq!(query.base_path, "/iac");
        assert_eq!(query.component.as_deref(), Some("api"));
        assert_eq!(query.nickname, "shop");
        assert!(query.has_component());
    }

    #[test]
    fn test_parse_legacy_field_name() {
        let query =
            ResolutionQuery::from_json(r#"{"iac_base": "/iac", "nickname": "shop"}"#).unwrap();
        assert_eq!(query.base_path, "/iac");
        assert!(!query.has_component());
    }

    #[test]
    fn test_blank_component_means_direct_mode() {
        let query = ResolutionQuery::from_json(
            r#"{"base_path": "/iac", "component": "  ", "nickname": "shop"}"#,
        )
        .unwrap();
        assert_eq!(query.component, None);
    }

    #[test]
    fn test_invalid_queries() {
        assert!(matches!(
            ResolutionQuery::from_json("not json"),
            Err(ResolveError::InvalidQuery(_))
        ));
        assert!(matches!(
            ResolutionQuery::from_json(r#"{"base_path": "/iac"}"#),
            Err(ResolveError::InvalidQuery(_))
        ));
        assert!(matches!(
            ResolutionQuery::from_json(r#"{"base_path": "", "nickname": "x"}"#),
            Err(ResolveError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_from_reader() {
        let input = br#"{"base_path": "/iac", "nickname": "shop"}"#;
        let query = ResolutionQuery::from_reader(&input[..]).unwrap();
        assert_eq!(query.nickname, "shop");
    }
}
