//! logout-server
//!
//! 清理负载均衡器认证 Cookie 并跳转到身份提供方登出端点。
//!
//! Usage:
//!   COGNITO_CLIENT_ID=abc COGNITO_DOMAIN=auth.example.com logout-server --port 8080

use std::net::{IpAddr, SocketAddr};

use clap::Parser;

use nickname_resolver::config::{LoggingConfig, LogoutConfig, DEFAULT_COOKIE_PREFIX};
use nickname_resolver::{logger, server};

/// Clear load-balancer session cookies and redirect to the identity provider logout
#[derive(Parser, Debug)]
#[command(name = "logout-server", version)]
struct Args {
    /// Identity provider application client ID
    #[arg(long, env = "COGNITO_CLIENT_ID")]
    client_id: String,

    /// Identity provider domain, without scheme
    #[arg(long, env = "COGNITO_DOMAIN")]
    idp_domain: String,

    /// Default post-logout redirect
    #[arg(long, env = "LOGOUT_REDIRECT")]
    default_redirect: Option<String>,

    /// Comma-separated cookie name prefixes to clear
    #[arg(long, env = "COOKIE_PREFIXES", default_value = DEFAULT_COOKIE_PREFIX)]
    cookie_prefixes: String,

    /// Shared cookie domain (e.g. .example.com)
    #[arg(long, env = "COOKIE_DOMAIN")]
    cookie_domain: Option<String>,

    /// Listen address
    #[arg(long, env = "LOGOUT_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Listen port
    #[arg(long, env = "LOGOUT_PORT", default_value_t = 8080)]
    port: u16,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn logout_config(&self) -> LogoutConfig {
        let mut config = LogoutConfig::new(self.client_id.trim(), self.idp_domain.trim());
        config.default_redirect = self
            .default_redirect
            .clone()
            .filter(|uri| !uri.trim().is_empty());
        let prefixes = LogoutConfig::parse_prefixes(&self.cookie_prefixes);
        if !prefixes.is_empty() {
            config.cookie_prefixes = prefixes;
        }
        config.shared_cookie_domain = self
            .cookie_domain
            .clone()
            .filter(|domain| !domain.trim().is_empty());
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(&LoggingConfig {
        level: args.log_level.clone(),
    });

    if args.client_id.trim().is_empty() || args.idp_domain.trim().is_empty() {
        anyhow::bail!("client id and identity provider domain must not be empty");
    }

    let addr = SocketAddr::new(args.host, args.port);
    server::serve(addr, args.logout_config()).await
}
