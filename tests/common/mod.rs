//! 测试辅助模块
//! 提供测试工具和辅助函数

#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use ironseed::{
    config::WalletConfig,
    domain::{DerivationEngine, WordCount},
    infrastructure::{JsonFileStore, KeyValueStore, MemoryStore},
    service::{MnemonicManager, RegenerationPolicy, WalletRegistry, WalletService},
};

/// BIP39 标准测试助记词
pub const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

pub fn wallet_config() -> WalletConfig {
    WalletConfig {
        word_count: WordCount::Twelve,
        bip39_passphrase: String::new(),
        regeneration_policy: RegenerationPolicy::Skip,
    }
}

/// 内存存储上的管理器与注册表
pub fn memory_setup() -> (Arc<MemoryStore>, MnemonicManager, WalletRegistry) {
    let store = Arc::new(MemoryStore::new());
    let manager = MnemonicManager::load(store.clone(), WordCount::Twelve).unwrap();
    let registry = WalletRegistry::new(store.clone(), DerivationEngine::default());
    (store, manager, registry)
}

/// 基于 JSON 文件存储的服务
pub fn file_service(path: &Path) -> WalletService {
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(path).unwrap());
    WalletService::new(store, &wallet_config()).unwrap()
}
