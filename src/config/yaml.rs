//! YAML 配置文件支持
//!
//! 提供 YAML 配置的加载与序列化

use super::types::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置加载失败
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无法读取配置文件 {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("配置文件格式错误: {0}")]
    ParseError(String),
    #[error("配置序列化失败: {0}")]
    SerializeError(String),
    #[error("配置项无效: {0}")]
    ValidationError(String),
}

/// 已加载的配置及其来源路径
#[derive(Debug)]
pub struct ConfigManager {
    config: Config,
    config_path: PathBuf,
}

impl ConfigManager {
    /// 加载配置文件，文件不存在时使用默认值
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            })?;
            Self::parse_yaml(&content)?
        } else {
            tracing::debug!("[CONFIG] 配置文件不存在，使用默认配置: {}", path.display());
            Config::default()
        };

        Ok(Self {
            config,
            config_path: path.to_path_buf(),
        })
    }

    /// 从 YAML 字符串解析配置
    ///
    /// 空文件视为默认配置
    pub fn parse_yaml(yaml: &str) -> Result<Config, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// 将配置序列化为 YAML 字符串
    pub fn to_yaml(config: &Config) -> Result<String, ConfigError> {
        serde_yaml::to_string(config).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// 校验配置
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let resolver = &config.resolver;
        if resolver.spec_pointer_fields.is_empty() {
            return Err(ConfigError::ValidationError(
                "resolver.spec_pointer_fields must not be empty".to_string(),
            ));
        }
        if resolver.nickname_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "resolver.nickname_extensions must not be empty".to_string(),
            ));
        }
        for (name, segment) in [
            ("component_record", &resolver.component_record),
            ("spec_namespace", &resolver.spec_namespace),
            ("backend_namespace", &resolver.backend_namespace),
            ("backend_record", &resolver.backend_record),
        ] {
            if segment.is_empty() || segment.contains('/') {
                return Err(ConfigError::ValidationError(format!(
                    "resolver.{} must be a single path segment, got {:?}",
                    name, segment
                )));
            }
        }
        if config.output.route_map_key == config.output.specification_key {
            return Err(ConfigError::ValidationError(
                "output.route_map_key and output.specification_key must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 取出配置
    pub fn into_config(self) -> Config {
        self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nickname-resolver")
            .join("config.yaml")
    }
}

/// 加载配置
///
/// 显式指定的文件必须存在；只有默认路径允许缺失。
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            })?;
            ConfigManager::parse_yaml(&content)
        }
        None => Ok(ConfigManager::load(&ConfigManager::default_config_path())?.into_config()),
    }
}
