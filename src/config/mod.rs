//! 配置管理模块
//!
//! 提供 YAML 配置文件支持，命令行与环境变量可覆盖文件中的值

mod types;
mod yaml;

pub use types::{
    BlobBackendConfig, Config, LoggingConfig, LogoutConfig, OutputSettings, ResolverSettings,
    SpecRecord, StoreBackendConfig, DEFAULT_BLOB_ROOT, DEFAULT_COOKIE_PREFIX, DEFAULT_STORE_ROOT,
};
pub use yaml::{load_config, ConfigError, ConfigManager};

#[cfg(test)]
mod tests;
