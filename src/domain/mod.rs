//! Domain 模块
//!
//! 链定义、路径分配、助记词与密钥派生，全部为纯计算，不涉及存储

pub mod chain_config;
pub mod derivation;
pub mod derivation_path;
pub mod mnemonic;
pub mod wallet_key;

// 重新导出常用类型
pub use chain_config::{AddressFormat, ChainVariant, CurveType};
pub use derivation::{DerivationEngine, DerivationStrategy, DerivationStrategyFactory};
pub use derivation_path::{allocate, DerivationPath, PathSegment};
pub use mnemonic::{Mnemonic, WordCount};
pub use wallet_key::WalletKey;
