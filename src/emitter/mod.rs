//! 结果输出模块
//!
//! 正常模式向标准输出写一个 JSON 对象，其中路由表是 JSON 编码后的字符串
//! （下游按字符串字段读取，保持双重编码）；dry-run 模式只向诊断流打印路由。

use crate::config::OutputSettings;
use crate::models::ResolutionOutcome;
use crate::resolver::ResolveError;
use indexmap::IndexMap;
use std::io::Write;

/// 输出模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    /// 机器可读输出
    Normal {
        /// 是否附带规范原文
        include_specification: bool,
    },
    /// 仅打印解析结果
    DryRun,
}

/// 结果输出器
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    settings: OutputSettings,
}

impl Emitter {
    pub fn new(settings: OutputSettings) -> Self {
        Self { settings }
    }

    /// 按配置选择正常输出模式
    pub fn normal_mode(&self) -> EmitMode {
        EmitMode::Normal {
            include_specification: self.settings.include_specification,
        }
    }

    /// 渲染机器可读输出
    pub fn render(
        &self,
        outcome: &ResolutionOutcome,
        include_specification: bool,
    ) -> Result<String, ResolveError> {
        let mut output: IndexMap<&str, String> = IndexMap::new();
        output.insert(
            self.settings.route_map_key.as_str(),
            outcome.route_map.to_json_string()?,
        );
        if include_specification {
            output.insert(
                self.settings.specification_key.as_str(),
                outcome.specification_text.clone(),
            );
        }
        Ok(serde_json::to_string(&output)?)
    }

    /// 输出结果
    ///
    /// `out` 为机器可读输出通道，`diagnostics` 为面向操作者的诊断流
    pub fn emit<W: Write, D: Write>(
        &self,
        outcome: &ResolutionOutcome,
        mode: EmitMode,
        out: &mut W,
        diagnostics: &mut D,
    ) -> Result<(), ResolveError> {
        match mode {
            EmitMode::Normal {
                include_specification,
            } => {
                let rendered = self.render(outcome, include_specification)?;
                out.write_all(rendered.as_bytes())?;
                out.flush()?;
            }
            EmitMode::DryRun => {
                writeln!(
                    diagnostics,
                    "🔍 Dry run: {} route(s) resolved",
                    outcome.route_map.len()
                )?;
                for (route, identifier) in outcome.route_map.iter() {
                    writeln!(diagnostics, "  {} -> {}", route, identifier)?;
                }
                diagnostics.flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RouteMap;

    fn outcome() -> ResolutionOutcome {
        let mut route_map = RouteMap::new();
        route_map.insert("get", "/a", "id1");
        route_map.insert("post", "/b", "id2");
        ResolutionOutcome {
            route_map,
            specification_text: "paths: {}\n".to_string(),
        }
    }

    #[test]
    fn test_normal_output_double_encodes_route_map() {
        let emitter = Emitter::default();
        let mut out = Vec::new();
        let mut diag = Vec::new();

        emitter
            .emit(&outcome(), emitter.normal_mode(), &mut out, &mut diag)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let route_map = parsed["route_map"].as_str().unwrap();
        assert_eq!(route_map, r#"{"GET /a":"id1","POST /b":"id2"}"#);
        assert!(parsed.get("specification_text").is_none());
        assert!(diag.is_empty());
    }

    #[test]
    fn test_normal_output_with_specification() {
        let emitter = Emitter::new(OutputSettings {
            route_map_key: "lambda_integrations".to_string(),
            specification_key: "openapi_definition".to_string(),
            include_specification: true,
        });
        let rendered = emitter.render(&outcome(), true).unwrap();
        assert_eq!(
            rendered,
            r#"{"lambda_integrations":"{\"GET /a\":\"id1\",\"POST /b\":\"id2\"}","openapi_definition":"paths: {}\n"}"#
        );
    }

    #[test]
    fn test_dry_run_writes_only_diagnostics() {
        let emitter = Emitter::default();
        let mut out = Vec::new();
        let mut diag = Vec::new();

        emitter
            .emit(&outcome(), EmitMode::DryRun, &mut out, &mut diag)
            .unwrap();

        assert!(out.is_empty());
        let report = String::from_utf8(diag).unwrap();
        assert!(report.contains("2 route(s) resolved"));
        assert!(report.contains("  GET /a -> id1\n"));
        assert!(report.contains("  POST /b -> id2\n"));
    }
}
