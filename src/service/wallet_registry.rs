//! 钱包注册表
//!
//! 每条链只持久化一个派生路径的有序列表，密钥按需从 (助记词, 路径) 重建。
//! 列表中的原始字符串按存储原样保留，无法解析的条目在重建时跳过，
//! 但不会因为一次写入而被悄悄丢弃。

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        chain_config::ChainVariant,
        derivation::DerivationEngine,
        derivation_path::{allocate, DerivationPath, HARDENED_OFFSET},
        mnemonic::Mnemonic,
        wallet_key::WalletKey,
    },
    error::{DerivationError, StorageError, WalletError},
    infrastructure::storage::{wallet_paths_key, KeyValueStore},
    service::mnemonic_manager::MnemonicManager,
};

/// 重建失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegenerationPolicy {
    /// 静默跳过
    #[default]
    Skip,
    /// 跳过并记录 warn 日志
    Warn,
}

impl FromStr for RegenerationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "warn" => Ok(Self::Warn),
            other => Err(format!("unknown regeneration policy: {}", other)),
        }
    }
}

impl fmt::Display for RegenerationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Warn => write!(f, "warn"),
        }
    }
}

/// 重建时被跳过的路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub position: usize,
    pub path: String,
    pub error: DerivationError,
}

/// 重建成功的钱包，`position` 为其在路径列表中的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegeneratedWallet {
    pub position: usize,
    pub key: WalletKey,
}

/// 重建结果明细
#[derive(Debug, Clone, Default)]
pub struct RegenerationReport {
    pub wallets: Vec<RegeneratedWallet>,
    pub skipped: Vec<SkippedPath>,
}

impl RegenerationReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn into_keys(self) -> Vec<WalletKey> {
        self.wallets.into_iter().map(|w| w.key).collect()
    }
}

/// 钱包注册表
pub struct WalletRegistry {
    store: Arc<dyn KeyValueStore>,
    engine: DerivationEngine,
    policy: RegenerationPolicy,
}

impl WalletRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, engine: DerivationEngine) -> Self {
        Self {
            store,
            engine,
            policy: RegenerationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RegenerationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RegenerationPolicy {
        self.policy
    }

    pub fn engine(&self) -> &DerivationEngine {
        &self.engine
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 路径列表
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// 读取原始路径字符串；缺失或 JSON 损坏时返回空列表
    fn load_raw(&self, chain: ChainVariant) -> Result<Vec<String>, StorageError> {
        let Some(value) = self.store.get(&wallet_paths_key(chain))? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<String>>(&value) {
            Ok(paths) => Ok(paths),
            Err(e) => {
                tracing::warn!(chain = %chain, error = %e, "stored wallet paths are corrupt, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn save_raw(&self, chain: ChainVariant, paths: &[String]) -> Result<(), StorageError> {
        let value = serde_json::to_string(paths)?;
        self.store.set(&wallet_paths_key(chain), &value)
    }

    /// 已保存的派生路径，按添加顺序
    pub fn paths(&self, chain: ChainVariant) -> Result<Vec<DerivationPath>, StorageError> {
        let paths = self
            .load_raw(chain)?
            .into_iter()
            .filter_map(|raw| match DerivationPath::parse(&raw) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(chain = %chain, error = %e, "dropping unparsable stored path");
                    None
                }
            })
            .collect();
        Ok(paths)
    }

    /// 已保存的钱包数量（包括无法解析的条目）
    pub fn wallet_count(&self, chain: ChainVariant) -> Result<usize, StorageError> {
        Ok(self.load_raw(chain)?.len())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 增删
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// 追加一个新钱包
    ///
    /// 索引取当前列表长度，删除后可能与已有路径重复；派生成功后才写入。
    pub fn add_wallet(
        &self,
        chain: ChainVariant,
        manager: &MnemonicManager,
    ) -> Result<WalletKey, WalletError> {
        let mnemonic = manager.mnemonic().ok_or(WalletError::NoMnemonic)?;

        let mut paths = self.load_raw(chain)?;
        let index = u32::try_from(paths.len())
            .ok()
            .filter(|i| *i < HARDENED_OFFSET)
            .ok_or_else(|| DerivationError::invalid_path("", "wallet index out of range"))?;
        let path = allocate(chain, index);

        if paths.iter().any(|p| p == path.as_str()) {
            tracing::warn!(chain = %chain, path = %path, "allocated path already exists in wallet list");
        }

        let key = self.engine.derive(chain, mnemonic, &path)?;

        paths.push(path.as_str().to_string());
        self.save_raw(chain, &paths)?;

        tracing::info!(chain = %chain, path = %path, address = %key.public_address, "wallet added");
        Ok(key)
    }

    /// 按位置删除；越界时不做任何修改
    pub fn delete_wallet(&self, chain: ChainVariant, position: usize) -> Result<(), WalletError> {
        let mut paths = self.load_raw(chain)?;
        if position >= paths.len() {
            tracing::debug!(chain = %chain, position, len = paths.len(), "delete position out of range");
            return Ok(());
        }

        let removed = paths.remove(position);
        self.save_raw(chain, &paths)?;

        tracing::info!(chain = %chain, position, path = %removed, "wallet deleted");
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 重建
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    fn derive_raw(
        &self,
        chain: ChainVariant,
        mnemonic: &Mnemonic,
        raw: &str,
    ) -> Result<WalletKey, DerivationError> {
        let path = DerivationPath::parse(raw)?;
        self.engine.derive(chain, mnemonic, &path)
    }

    fn record_skip(&self, chain: ChainVariant, report: &mut RegenerationReport, skipped: SkippedPath) {
        if self.policy == RegenerationPolicy::Warn {
            tracing::warn!(
                chain = %chain,
                position = skipped.position,
                path = %skipped.path,
                error = %skipped.error,
                "skipping wallet that failed to regenerate"
            );
        }
        report.skipped.push(skipped);
    }

    /// 按顺序重建所有钱包，并列出被跳过的路径
    pub fn regenerate_report(
        &self,
        chain: ChainVariant,
        manager: &MnemonicManager,
    ) -> Result<RegenerationReport, StorageError> {
        let mut report = RegenerationReport::default();
        let Some(mnemonic) = manager.mnemonic() else {
            return Ok(report);
        };

        for (position, raw) in self.load_raw(chain)?.into_iter().enumerate() {
            match self.derive_raw(chain, mnemonic, &raw) {
                Ok(key) => report.wallets.push(RegeneratedWallet { position, key }),
                Err(error) => self.record_skip(
                    chain,
                    &mut report,
                    SkippedPath {
                        position,
                        path: raw,
                        error,
                    },
                ),
            }
        }

        tracing::debug!(
            chain = %chain,
            regenerated = report.wallets.len(),
            skipped = report.skipped.len(),
            "wallets regenerated"
        );
        Ok(report)
    }

    /// 按顺序重建所有钱包；失败的条目被跳过，无助记词时为空
    pub fn regenerate_all(
        &self,
        chain: ChainVariant,
        manager: &MnemonicManager,
    ) -> Result<Vec<WalletKey>, StorageError> {
        Ok(self.regenerate_report(chain, manager)?.into_keys())
    }

    /// 同 `regenerate_all`，派生在阻塞线程池中执行
    pub async fn regenerate_all_async(
        &self,
        chain: ChainVariant,
        manager: &MnemonicManager,
    ) -> Result<Vec<WalletKey>, StorageError> {
        let mut report = RegenerationReport::default();
        let Some(mnemonic) = manager.mnemonic() else {
            return Ok(Vec::new());
        };

        for (position, raw) in self.load_raw(chain)?.into_iter().enumerate() {
            let result = match DerivationPath::parse(&raw) {
                Ok(path) => self.engine.derive_task(chain, mnemonic.clone(), path).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(key) => report.wallets.push(RegeneratedWallet { position, key }),
                Err(error) => self.record_skip(
                    chain,
                    &mut report,
                    SkippedPath {
                        position,
                        path: raw,
                        error,
                    },
                ),
            }
        }

        Ok(report.into_keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::mnemonic::WordCount, infrastructure::storage::MemoryStore};

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn setup() -> (Arc<MemoryStore>, MnemonicManager, WalletRegistry) {
        let store = Arc::new(MemoryStore::new());
        let mut manager = MnemonicManager::load(store.clone(), WordCount::Twelve).unwrap();
        manager.import(TEST_MNEMONIC).unwrap();
        let registry = WalletRegistry::new(store.clone(), DerivationEngine::default());
        (store, manager, registry)
    }

    fn stored(store: &MemoryStore, chain: ChainVariant) -> Vec<String> {
        store
            .get(&wallet_paths_key(chain))
            .unwrap()
            .map(|v| serde_json::from_str(&v).unwrap())
            .unwrap_or_default()
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("skip".parse::<RegenerationPolicy>().unwrap(), RegenerationPolicy::Skip);
        assert_eq!(" WARN ".parse::<RegenerationPolicy>().unwrap(), RegenerationPolicy::Warn);
        assert!("retry".parse::<RegenerationPolicy>().is_err());
    }

    #[test]
    fn test_add_wallet_requires_mnemonic() {
        let store = Arc::new(MemoryStore::new());
        let manager = MnemonicManager::load(store.clone(), WordCount::Twelve).unwrap();
        let registry = WalletRegistry::new(store.clone(), DerivationEngine::default());

        let err = registry.add_wallet(ChainVariant::Solana, &manager).unwrap_err();
        assert!(matches!(err, WalletError::NoMnemonic));
        assert!(stored(&store, ChainVariant::Solana).is_empty());
    }

    #[test]
    fn test_add_wallet_allocates_sequential_paths() {
        let (store, manager, registry) = setup();

        let first = registry.add_wallet(ChainVariant::Solana, &manager).unwrap();
        let second = registry.add_wallet(ChainVariant::Solana, &manager).unwrap();

        assert_eq!(first.path.as_str(), "m/44'/501'/0'/0'");
        assert_eq!(second.path.as_str(), "m/44'/501'/1'/0'");
        assert_eq!(
            stored(&store, ChainVariant::Solana),
            vec!["m/44'/501'/0'/0'".to_string(), "m/44'/501'/1'/0'".to_string()]
        );
        assert!(stored(&store, ChainVariant::Ethereum).is_empty());
    }

    #[test]
    fn test_regenerate_matches_added_keys() {
        let (_, manager, registry) = setup();

        let added: Vec<WalletKey> = (0..3)
            .map(|_| registry.add_wallet(ChainVariant::Ethereum, &manager).unwrap())
            .collect();

        let regenerated = registry.regenerate_all(ChainVariant::Ethereum, &manager).unwrap();
        assert_eq!(regenerated, added);
    }

    #[test]
    fn test_delete_wallet_by_position() {
        let (store, manager, registry) = setup();
        for _ in 0..3 {
            registry.add_wallet(ChainVariant::Solana, &manager).unwrap();
        }

        registry.delete_wallet(ChainVariant::Solana, 1).unwrap();
        assert_eq!(
            stored(&store, ChainVariant::Solana),
            vec!["m/44'/501'/0'/0'".to_string(), "m/44'/501'/2'/0'".to_string()]
        );

        // 越界删除不修改列表
        registry.delete_wallet(ChainVariant::Solana, 9).unwrap();
        assert_eq!(stored(&store, ChainVariant::Solana).len(), 2);
    }

    #[test]
    fn test_index_reuse_after_delete() {
        let (store, manager, registry) = setup();
        for _ in 0..3 {
            registry.add_wallet(ChainVariant::Solana, &manager).unwrap();
        }
        registry.delete_wallet(ChainVariant::Solana, 0).unwrap();

        let key = registry.add_wallet(ChainVariant::Solana, &manager).unwrap();
        assert_eq!(key.path.as_str(), "m/44'/501'/2'/0'");

        let paths = stored(&store, ChainVariant::Solana);
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[1], paths[2]);
    }

    #[test]
    fn test_corrupt_path_list_reads_empty() {
        let (store, manager, registry) = setup();
        store
            .set(&wallet_paths_key(ChainVariant::Solana), "{not json")
            .unwrap();

        assert!(registry.paths(ChainVariant::Solana).unwrap().is_empty());
        assert!(registry
            .regenerate_all(ChainVariant::Solana, &manager)
            .unwrap()
            .is_empty());

        let key = registry.add_wallet(ChainVariant::Solana, &manager).unwrap();
        assert_eq!(key.path.as_str(), "m/44'/501'/0'/0'");
    }

    #[test]
    fn test_regenerate_skips_failures() {
        let (store, manager, registry) = setup();
        let paths = serde_json::to_string(&[
            "m/44'/501'/0'/0'",
            "garbage",
            "m/44'/501'/1'/0",
            "m/44'/501'/2'/0'",
        ])
        .unwrap();
        store.set(&wallet_paths_key(ChainVariant::Solana), &paths).unwrap();

        let registry = registry.with_policy(RegenerationPolicy::Warn);
        let report = registry.regenerate_report(ChainVariant::Solana, &manager).unwrap();

        assert_eq!(report.wallets.len(), 2);
        assert_eq!(report.wallets[1].position, 3);
        assert_eq!(report.wallets[1].key.path.as_str(), "m/44'/501'/2'/0'");
        assert!(!report.is_complete());
        assert_eq!(
            report.skipped.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![1, 2]
        );

        // 解析失败的条目只在读取时忽略
        assert_eq!(registry.paths(ChainVariant::Solana).unwrap().len(), 3);
        assert_eq!(registry.wallet_count(ChainVariant::Solana).unwrap(), 4);
    }

    #[test]
    fn test_regenerate_without_mnemonic_is_empty() {
        let (store, mut manager, registry) = setup();
        registry.add_wallet(ChainVariant::Solana, &manager).unwrap();

        manager.clear().unwrap();
        assert!(registry
            .regenerate_all(ChainVariant::Solana, &manager)
            .unwrap()
            .is_empty());
        assert!(stored(&store, ChainVariant::Solana).is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_async_matches_sync() {
        let (_, manager, registry) = setup();
        registry.add_wallet(ChainVariant::Solana, &manager).unwrap();
        registry.add_wallet(ChainVariant::Solana, &manager).unwrap();

        let sync = registry.regenerate_all(ChainVariant::Solana, &manager).unwrap();
        let async_keys = registry
            .regenerate_all_async(ChainVariant::Solana, &manager)
            .await
            .unwrap();
        assert_eq!(sync, async_keys);
    }
}
