//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::{fmt, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{domain::mnemonic::WordCount, service::wallet_registry::RegenerationPolicy};

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: String, // "file" or "memory"
    pub path: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
    pub enable_file_logging: bool,
    pub log_file_path: Option<String>,
}

/// 钱包配置
#[derive(Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub word_count: WordCount,
    /// BIP39 口令，默认为空
    #[serde(default)]
    pub bip39_passphrase: String,
    #[serde(default)]
    pub regeneration_policy: RegenerationPolicy,
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("word_count", &self.word_count)
            .field(
                "bip39_passphrase",
                &if self.bip39_passphrase.is_empty() { "" } else { "[REDACTED]" },
            )
            .field("regeneration_policy", &self.regeneration_policy)
            .finish()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: std::env::var("IRONSEED_STORE_BACKEND").unwrap_or_else(|_| "file".into()),
            path: std::env::var("IRONSEED_STORE_PATH")
                .unwrap_or_else(|_| "./data/ironseed.json".into()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
            enable_file_logging: std::env::var("LOG_FILE_ENABLED")
                .ok()
                .map(|v| v == "1")
                .unwrap_or(false),
            log_file_path: std::env::var("LOG_FILE_PATH").ok(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            word_count: std::env::var("MNEMONIC_WORD_COUNT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .and_then(|n| WordCount::try_from(n).ok())
                .unwrap_or_default(),
            bip39_passphrase: std::env::var("BIP39_PASSPHRASE").unwrap_or_default(),
            regeneration_policy: std::env::var("REGENERATION_POLICY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            wallet: WalletConfig::default(),
        })
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                // 文件中缺省的段落仍由环境变量补齐
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        let valid_backends = ["file", "memory"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            anyhow::bail!("IRONSEED_STORE_BACKEND must be one of: {:?}", valid_backends);
        }

        if self.storage.backend == "file" && self.storage.path.trim().is_empty() {
            anyhow::bail!("IRONSEED_STORE_PATH must not be empty for the file backend");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        Ok(())
    }
}
