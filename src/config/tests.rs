//! 配置模块测试
//!
//! 使用 proptest 进行属性测试

use crate::config::{
    load_config, BlobBackendConfig, Config, ConfigError, ConfigManager, LogoutConfig, SpecRecord,
    StoreBackendConfig,
};
use proptest::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// 生成随机的路径片段
fn arb_segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,15}".prop_map(|s| s)
}

/// 生成随机的目录路径
fn arb_root() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_segment(), 1..5).prop_map(|parts| format!("/{}", parts.join("/")))
}

proptest! {
    #[test]
    fn prop_file_store_uri_keeps_root(root in arb_root()) {
        let parsed = StoreBackendConfig::from_uri(&format!("file://{}", root)).unwrap();
        prop_assert_eq!(parsed, StoreBackendConfig::File { root: PathBuf::from(&root) });

        let parsed = BlobBackendConfig::from_uri(&format!("file://{}", root)).unwrap();
        prop_assert_eq!(parsed, BlobBackendConfig::File { root: PathBuf::from(&root) });
    }

    #[test]
    fn prop_yaml_roundtrip_keeps_resolver_settings(
        spec_namespace in arb_segment(),
        backend_namespace in arb_segment(),
        identifier_field in arb_segment(),
    ) {
        let mut config = Config::default();
        config.resolver.spec_namespace = spec_namespace;
        config.resolver.backend_namespace = backend_namespace;
        config.resolver.identifier_field = identifier_field;

        let yaml = ConfigManager::to_yaml(&config).unwrap();
        let parsed = ConfigManager::parse_yaml(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}

#[test]
fn test_empty_yaml_is_default() {
    assert_eq!(ConfigManager::parse_yaml("").unwrap(), Config::default());
    assert_eq!(ConfigManager::parse_yaml("\n  \n").unwrap(), Config::default());
}

#[test]
fn test_defaults_match_parameter_layout() {
    let config = Config::default();
    assert_eq!(config.resolver.component_record, "config");
    assert_eq!(config.resolver.spec_namespace, "openapi");
    assert_eq!(config.resolver.spec_record, SpecRecord::Runtime);
    assert_eq!(config.resolver.backend_namespace, "lambda");
    assert_eq!(config.resolver.backend_record, "runtime");
    assert_eq!(config.resolver.identifier_field, "arn");
    assert_eq!(config.output.route_map_key, "route_map");
    assert!(!config.output.include_specification);
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
store:
  backend: http
  endpoint: https://params.internal/v1
  token: secret
blob:
  backend: file
  root: /srv/objects
resolver:
  spec_record: config
output:
  route_map_key: lambda_integrations
  specification_key: openapi_definition
  include_specification: true
logging:
  level: debug
"#;
    let config = ConfigManager::parse_yaml(yaml).unwrap();
    assert_eq!(
        config.store,
        StoreBackendConfig::Http {
            endpoint: "https://params.internal/v1".to_string(),
            token: Some("secret".to_string()),
        }
    );
    assert_eq!(
        config.blob,
        BlobBackendConfig::File {
            root: PathBuf::from("/srv/objects")
        }
    );
    assert_eq!(config.resolver.spec_record, SpecRecord::Config);
    // 未写出的字段保持默认值
    assert_eq!(config.resolver.backend_namespace, "lambda");
    assert_eq!(config.output.route_map_key, "lambda_integrations");
    assert!(config.output.include_specification);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        ConfigManager::parse_yaml("store: [1, 2"),
        Err(ConfigError::ParseError(_))
    ));
    assert!(matches!(
        ConfigManager::parse_yaml("store:\n  backend: carrier-pigeon\n"),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_validation_errors() {
    assert!(matches!(
        ConfigManager::parse_yaml("resolver:\n  nickname_extensions: []\n"),
        Err(ConfigError::ValidationError(_))
    ));
    assert!(matches!(
        ConfigManager::parse_yaml("resolver:\n  backend_namespace: a/b\n"),
        Err(ConfigError::ValidationError(_))
    ));
    assert!(matches!(
        ConfigManager::parse_yaml("output:\n  route_map_key: x\n  specification_key: x\n"),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "store:\n  backend: snapshot\n  path: /tmp/params.yaml").unwrap();

    let manager = ConfigManager::load(file.path()).unwrap();
    assert_eq!(manager.config_path(), file.path());
    assert_eq!(
        manager.config().store,
        StoreBackendConfig::Snapshot {
            path: PathBuf::from("/tmp/params.yaml")
        }
    );
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let manager = ConfigManager::load(&dir.path().join("absent.yaml")).unwrap();
    assert_eq!(manager.config(), &Config::default());
}

#[test]
fn test_explicit_missing_config_is_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("typo.yaml");

    match load_config(Some(&missing)) {
        Err(ConfigError::ReadError { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected read error, got {:?}", other),
    }
}

#[test]
fn test_explicit_config_is_loaded() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "logging:\n  level: debug").unwrap();

    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_store_uri_parsing() {
    assert_eq!(
        StoreBackendConfig::from_uri("snapshot:///etc/params.json").unwrap(),
        StoreBackendConfig::Snapshot {
            path: PathBuf::from("/etc/params.json")
        }
    );
    assert_eq!(
        StoreBackendConfig::from_uri("http://localhost:4566").unwrap(),
        StoreBackendConfig::Http {
            endpoint: "http://localhost:4566".to_string(),
            token: None
        }
    );
    assert!(StoreBackendConfig::from_uri("file://").is_err());
    assert!(StoreBackendConfig::from_uri("ssm://params").is_err());
    assert!(BlobBackendConfig::from_uri("snapshot:///x").is_err());
}

#[test]
fn test_logout_prefix_parsing() {
    assert_eq!(
        LogoutConfig::parse_prefixes(" alb_auth, ,grafana_session ,"),
        vec!["alb_auth".to_string(), "grafana_session".to_string()]
    );
    let config = LogoutConfig::new("client", "auth.example.com");
    assert_eq!(config.cookie_prefixes, vec!["AWSELBAuthSessionCookie".to_string()]);
}
