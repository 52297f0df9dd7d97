//! 键值存储接口
//!
//! 只持久化两类数据：助记词原文，以及每条链的派生路径 JSON 数组。

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;

use crate::{
    config::StorageConfig, domain::chain_config::ChainVariant, error::StorageError,
    infrastructure::file_store::JsonFileStore,
};

/// 助记词键
pub const MNEMONIC_KEY: &str = "mnemonic";

/// 路径列表键前缀
pub const WALLET_PATHS_PREFIX: &str = "walletPaths-";

/// 旧版本写入的钱包数据键前缀，清除时一并删除
pub const LEGACY_WALLET_DATA_PREFIX: &str = "walletData-";

/// 链的路径列表键名
pub fn wallet_paths_key(chain: ChainVariant) -> String {
    format!("{}{}", WALLET_PATHS_PREFIX, chain.slug())
}

/// 是否为钱包注册表拥有的键
pub fn is_registry_key(key: &str) -> bool {
    key.starts_with(WALLET_PATHS_PREFIX) || key.starts_with(LEGACY_WALLET_DATA_PREFIX)
}

/// 字符串键值存储
///
/// 写入为整值替换；实现需保证单次 `set`/`remove` 的原子性。
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// 进程内存储
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.lock().keys().cloned().collect())
    }
}

/// 按配置打开存储后端
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "file" => Ok(Arc::new(JsonFileStore::open(&config.path)?)),
        other => Err(StorageError::Backend(format!("unknown storage backend: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_paths_key() {
        assert_eq!(wallet_paths_key(ChainVariant::Solana), "walletPaths-solana");
        assert_eq!(wallet_paths_key(ChainVariant::Ethereum), "walletPaths-ethereum");
    }

    #[test]
    fn test_registry_key_detection() {
        assert!(is_registry_key("walletPaths-solana"));
        assert!(is_registry_key("walletData-ethereum"));
        assert!(!is_registry_key(MNEMONIC_KEY));
        assert!(!is_registry_key("theme"));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));

        store.set("b", "3").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);

        store.remove("a").unwrap();
        store.remove("missing").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_open_store_backends() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = StorageConfig {
            backend: "file".into(),
            path: dir.path().join("store.json").to_string_lossy().into_owned(),
        };

        let store = open_store(&config).unwrap();
        store.set(MNEMONIC_KEY, "x").unwrap();
        assert!(dir.path().join("store.json").exists());

        config.backend = "memory".into();
        assert!(open_store(&config).unwrap().keys().unwrap().is_empty());

        config.backend = "sqlite".into();
        assert!(matches!(open_store(&config), Err(StorageError::Backend(_))));
    }
}
