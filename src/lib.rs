//! IronSeed - 多链分层确定性钱包密钥管理
//!
//! 一个助记词派生出 Solana 与 Ethereum 的多个钱包；
//! 只持久化助记词和每条链的派生路径，密钥随时由两者重建。

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod service;
pub mod utils;

// 重新导出常用类型
pub use error::{DerivationError, MnemonicError, StorageError, WalletError};

// 统一模块导出
pub mod prelude {
    pub use crate::{
        domain::{allocate, ChainVariant, DerivationEngine, DerivationPath, Mnemonic, WalletKey},
        error::{DerivationError, MnemonicError, StorageError, WalletError},
        infrastructure::{JsonFileStore, KeyValueStore, MemoryStore},
        service::{MnemonicManager, RegenerationPolicy, WalletRegistry, WalletService},
    };
}
