//! nickname-resolver CLI
//!
//! 从标准输入读取一个查询对象，解析出路由表并写到标准输出。
//!
//! Usage:
//!   echo '{"base_path": "/iac", "component": "api", "nickname": "shop"}' \
//!     | nickname-resolver --store file:///srv/params --blob file:///srv/objects
//!
//!   # 只打印解析结果，不产生机器可读输出
//!   echo '{"base_path": "/iac", "nickname": "shop"}' | nickname-resolver --dry-run

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use nickname_resolver::config::{
    load_config, BlobBackendConfig, Config, SpecRecord, StoreBackendConfig,
};
use nickname_resolver::store::{build_blob_store, build_config_store};
use nickname_resolver::{logger, EmitMode, Emitter, NicknameResolver, ResolutionQuery};

/// Resolve an API nickname into a `METHOD PATH -> backend` route map
#[derive(Parser, Debug)]
#[command(name = "nickname-resolver", version)]
#[command(about = "Resolve an API nickname into a route map for the deployment pipeline")]
struct Args {
    /// Print resolved routes to stderr instead of emitting JSON
    #[arg(long)]
    dry_run: bool,

    /// Include the raw specification text in the output
    #[arg(long)]
    emit_specification: bool,

    /// Which record holds the specification source
    #[arg(long, value_enum)]
    spec_record: Option<SpecRecord>,

    /// Path to the YAML settings file
    #[arg(long, env = "NICKNAME_RESOLVER_CONFIG")]
    config: Option<PathBuf>,

    /// Config store URI (file:///root, snapshot:///file.yaml, http(s)://endpoint)
    #[arg(long, env = "NICKNAME_RESOLVER_STORE")]
    store: Option<String>,

    /// Blob store URI (file:///root, http(s)://endpoint)
    #[arg(long, env = "NICKNAME_RESOLVER_BLOB")]
    blob: Option<String>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

/// 命令行参数覆盖配置文件
fn apply_overrides(config: &mut Config, args: &Args) -> anyhow::Result<()> {
    if let Some(uri) = &args.store {
        config.store = StoreBackendConfig::from_uri(uri).map_err(anyhow::Error::msg)?;
    }
    if let Some(uri) = &args.blob {
        config.blob = BlobBackendConfig::from_uri(uri).map_err(anyhow::Error::msg)?;
    }
    if let Some(record) = args.spec_record {
        config.resolver.spec_record = record;
    }
    if args.emit_specification {
        config.output.include_specification = true;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    Ok(())
}

/// 执行一次解析
///
/// 失败时向 `diagnostics` 写一行 `❌` 诊断，`out` 不会写入任何内容
fn run<R: Read, W: Write, D: Write>(
    args: Args,
    input: R,
    out: &mut W,
    diagnostics: &mut D,
) -> anyhow::Result<()> {
    let result = resolve_and_emit(args, input, out, diagnostics);
    if let Err(err) = &result {
        let _ = writeln!(diagnostics, "❌ {:#}", err);
    }
    result
}

fn resolve_and_emit<R: Read, W: Write, D: Write>(
    args: Args,
    input: R,
    out: &mut W,
    diagnostics: &mut D,
) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref()).context("failed to load settings")?;
    apply_overrides(&mut config, &args)?;
    logger::init(&config.logging);

    let query = ResolutionQuery::from_reader(input)?;
    tracing::info!(
        "[RESOLVER] base_path={} component={:?} nickname={}",
        query.base_path,
        query.component,
        query.nickname
    );

    let store = build_config_store(&config.store).context("failed to open config store")?;
    let blobs = build_blob_store(&config.blob).context("failed to open blob store")?;
    let resolver = NicknameResolver::new(store, blobs, config.resolver.clone());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let outcome = runtime.block_on(resolver.resolve(&query))?;

    let emitter = Emitter::new(config.output.clone());
    let mode = if args.dry_run {
        EmitMode::DryRun
    } else {
        emitter.normal_mode()
    };
    emitter.emit(&outcome, mode, out, diagnostics)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = run(
        args,
        io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
