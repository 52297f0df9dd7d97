pub mod mnemonic_manager;
pub mod wallet_registry;
pub mod wallet_service;

pub use mnemonic_manager::{MnemonicManager, MnemonicState};
pub use wallet_registry::{
    RegeneratedWallet, RegenerationPolicy, RegenerationReport, SkippedPath, WalletRegistry,
};
pub use wallet_service::WalletService;
