//! 配置类型定义
//!
//! 定义解析器与登出服务的配置结构，支持 YAML 序列化/反序列化。
//! 所有字段都有默认值，空配置文件即可运行。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 默认配置存储根目录
pub const DEFAULT_STORE_ROOT: &str = "/var/lib/nickname-resolver/parameters";
/// 默认对象存储根目录
pub const DEFAULT_BLOB_ROOT: &str = "/var/lib/nickname-resolver/objects";

// ============ 存储后端配置 ============

/// 配置存储后端
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// 目录镜像，每个参数一个文件
    File { root: PathBuf },
    /// 单个 YAML/JSON 快照文件
    Snapshot { path: PathBuf },
    /// HTTP 参数网关
    Http {
        endpoint: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },
}

impl Default for StoreBackendConfig {
    fn default() -> Self {
        StoreBackendConfig::File {
            root: PathBuf::from(DEFAULT_STORE_ROOT),
        }
    }
}

impl StoreBackendConfig {
    /// 从命令行 URI 解析
    ///
    /// 支持 `file:///root`、`snapshot:///file.yaml`、`http(s)://endpoint`
    pub fn from_uri(uri: &str) -> Result<Self, String> {
        if let Some(root) = uri.strip_prefix("file://") {
            return non_empty(root).map(|root| StoreBackendConfig::File { root: root.into() });
        }
        if let Some(path) = uri.strip_prefix("snapshot://") {
            return non_empty(path).map(|path| StoreBackendConfig::Snapshot { path: path.into() });
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Ok(StoreBackendConfig::Http {
                endpoint: uri.to_string(),
                token: None,
            });
        }
        Err(format!("unsupported store URI: {}", uri))
    }
}

/// 对象存储后端
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum BlobBackendConfig {
    /// 目录镜像，`<root>/<bucket>/<key>`
    File { root: PathBuf },
    /// S3 兼容端点（path-style）
    Http { endpoint: String },
}

impl Default for BlobBackendConfig {
    fn default() -> Self {
        BlobBackendConfig::File {
            root: PathBuf::from(DEFAULT_BLOB_ROOT),
        }
    }
}

impl BlobBackendConfig {
    /// 从命令行 URI 解析
    pub fn from_uri(uri: &str) -> Result<Self, String> {
        if let Some(root) = uri.strip_prefix("file://") {
            return non_empty(root).map(|root| BlobBackendConfig::File { root: root.into() });
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Ok(BlobBackendConfig::Http {
                endpoint: uri.to_string(),
            });
        }
        Err(format!("unsupported blob URI: {}", uri))
    }
}

fn non_empty(value: &str) -> Result<&str, String> {
    if value.is_empty() {
        Err("URI has an empty path".to_string())
    } else {
        Ok(value)
    }
}

// ============ 解析器配置 ============

/// 规范记录的后缀
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpecRecord {
    /// `<base>/openapi/<name>/runtime`
    #[default]
    Runtime,
    /// `<base>/openapi/<name>/config`
    Config,
}

impl SpecRecord {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecRecord::Runtime => "runtime",
            SpecRecord::Config => "config",
        }
    }
}

/// 解析器配置
///
/// 参数层级：
/// - `<base>/<component>/<nickname>/<component_record>` - 组件配置
/// - `<base>/<spec_namespace>/<spec>/<spec_record>` - 规范来源记录
/// - `<base>/<backend_namespace>/<backend>/<backend_record>` - 后端运行时记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolverSettings {
    /// 组件配置记录名
    #[serde(default = "default_component_record")]
    pub component_record: String,
    /// 规范命名空间
    #[serde(default = "default_spec_namespace")]
    pub spec_namespace: String,
    /// 规范记录后缀
    #[serde(default)]
    pub spec_record: SpecRecord,
    /// 后端命名空间
    #[serde(default = "default_backend_namespace")]
    pub backend_namespace: String,
    /// 后端运行时记录名
    #[serde(default = "default_backend_record")]
    pub backend_record: String,
    /// 组件配置中指向规范的字段，按优先级排列
    #[serde(default = "default_spec_pointer_fields")]
    pub spec_pointer_fields: Vec<String>,
    /// 操作上的后端昵称扩展字段，按优先级排列
    #[serde(default = "default_nickname_extensions")]
    pub nickname_extensions: Vec<String>,
    /// 后端运行时记录中的标识字段
    #[serde(default = "default_identifier_field")]
    pub identifier_field: String,
}

fn default_component_record() -> String {
    "config".to_string()
}

fn default_spec_namespace() -> String {
    "openapi".to_string()
}

fn default_backend_namespace() -> String {
    "lambda".to_string()
}

fn default_backend_record() -> String {
    "runtime".to_string()
}

fn default_spec_pointer_fields() -> Vec<String> {
    vec!["spec_pointer".to_string(), "openapi".to_string()]
}

fn default_nickname_extensions() -> Vec<String> {
    vec![
        "x-backend-nickname".to_string(),
        "x-lambda-nickname".to_string(),
    ]
}

fn default_identifier_field() -> String {
    "arn".to_string()
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            component_record: default_component_record(),
            spec_namespace: default_spec_namespace(),
            spec_record: SpecRecord::default(),
            backend_namespace: default_backend_namespace(),
            backend_record: default_backend_record(),
            spec_pointer_fields: default_spec_pointer_fields(),
            nickname_extensions: default_nickname_extensions(),
            identifier_field: default_identifier_field(),
        }
    }
}

// ============ 输出配置 ============

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSettings {
    /// 路由表字段名
    #[serde(default = "default_route_map_key")]
    pub route_map_key: String,
    /// 规范原文字段名
    #[serde(default = "default_specification_key")]
    pub specification_key: String,
    /// 是否同时输出规范原文
    #[serde(default)]
    pub include_specification: bool,
}

fn default_route_map_key() -> String {
    "route_map".to_string()
}

fn default_specification_key() -> String {
    "specification_text".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            route_map_key: default_route_map_key(),
            specification_key: default_specification_key(),
            include_specification: false,
        }
    }
}

// ============ 日志配置 ============

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// 日志级别（`RUST_LOG` 优先）
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============ 主配置 ============

/// 解析器主配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// 配置存储后端
    #[serde(default)]
    pub store: StoreBackendConfig,
    /// 对象存储后端
    #[serde(default)]
    pub blob: BlobBackendConfig,
    /// 解析器配置
    #[serde(default)]
    pub resolver: ResolverSettings,
    /// 输出配置
    #[serde(default)]
    pub output: OutputSettings,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============ 登出服务配置 ============

/// 默认清理的 Cookie 前缀
pub const DEFAULT_COOKIE_PREFIX: &str = "AWSELBAuthSessionCookie";

/// 登出服务配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogoutConfig {
    /// 身份提供方客户端 ID
    pub client_id: String,
    /// 身份提供方域名（不含协议）
    pub idp_domain: String,
    /// 全局默认登出后跳转地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_redirect: Option<String>,
    /// 需要清理的 Cookie 名前缀
    #[serde(default = "default_cookie_prefixes")]
    pub cookie_prefixes: Vec<String>,
    /// 共享 Cookie 域
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_cookie_domain: Option<String>,
}

fn default_cookie_prefixes() -> Vec<String> {
    vec![DEFAULT_COOKIE_PREFIX.to_string()]
}

impl LogoutConfig {
    pub fn new(client_id: impl Into<String>, idp_domain: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            idp_domain: idp_domain.into(),
            default_redirect: None,
            cookie_prefixes: default_cookie_prefixes(),
            shared_cookie_domain: None,
        }
    }

    /// 解析逗号分隔的前缀列表，忽略空项
    pub fn parse_prefixes(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
            .map(str::to_string)
            .collect()
    }
}
