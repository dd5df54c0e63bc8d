//! Nickname Resolver - API 路由表解析工具
//!
//! 将组件/规范昵称沿配置存储中的引用链解析为 `METHOD PATH -> 后端标识` 路由表，
//! 供部署流水线作为一次性步骤调用。同时附带一个清理会话 Cookie 的登出服务。

// 核心模块
pub mod config;
pub mod emitter;
pub mod logger;
pub mod models;
pub mod resolver;
pub mod server;
pub mod store;

// 重新导出核心类型
pub use config::{Config, ConfigManager};
pub use emitter::{EmitMode, Emitter};
pub use models::{ResolutionOutcome, ResolutionQuery, RouteMap, SourceDescriptor};
pub use resolver::{NicknameResolver, ResolveError};
pub use store::{BlobStore, ConfigStore, StoreValue};
