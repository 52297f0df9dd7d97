//! IronSeed 命令行入口

use anyhow::{Context, Result};
use clap::Parser;
use ironseed::{
    cli::{self, Cli},
    config::Config,
    infrastructure::{logging, storage},
    service::WalletService,
};

fn main() -> Result<()> {
    // 1. 加载环境变量
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    // 2. 加载配置（命令行指定 > CONFIG_PATH > 环境变量）
    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var("CONFIG_PATH").ok().map(Into::into));
    if let Some(path) = &args.config {
        anyhow::ensure!(path.exists(), "Config file not found: {}", path.display());
    }
    let config = Config::from_env_and_file(config_path.as_ref())?;
    config.validate().context("Invalid configuration")?;

    // 3. 初始化日志
    logging::init_logging(&config.logging)?;
    tracing::debug!(backend = %config.storage.backend, policy = %config.wallet.regeneration_policy, "configuration loaded");

    // 4. 打开存储并加载助记词
    let store = storage::open_store(&config.storage)
        .with_context(|| format!("Failed to open store at {}", config.storage.path))?;
    let mut service = WalletService::new(store, &config.wallet)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let stdout = std::io::stdout();
    cli::execute(&mut service, args.command, &mut stdout.lock())
}
