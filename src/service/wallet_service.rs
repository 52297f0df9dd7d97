//! 钱包服务门面
//!
//! 把助记词管理器和钱包注册表组装在同一个存储上，
//! 向命令行等外层提供一组扁平的操作。

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::{
    config::WalletConfig,
    domain::{chain_config::ChainVariant, derivation::DerivationEngine, wallet_key::WalletKey},
    error::WalletError,
    infrastructure::storage::KeyValueStore,
    service::{
        mnemonic_manager::MnemonicManager,
        wallet_registry::{RegenerationReport, WalletRegistry},
    },
};

pub struct WalletService {
    manager: MnemonicManager,
    registry: WalletRegistry,
}

impl WalletService {
    /// 在给定存储上创建服务并加载助记词
    pub fn new(store: Arc<dyn KeyValueStore>, config: &WalletConfig) -> Result<Self, WalletError> {
        let manager = MnemonicManager::load(store.clone(), config.word_count)?;
        let engine = DerivationEngine::new(config.bip39_passphrase.clone());
        let registry = WalletRegistry::new(store, engine).with_policy(config.regeneration_policy);

        Ok(Self { manager, registry })
    }

    pub fn mnemonic_manager(&self) -> &MnemonicManager {
        &self.manager
    }

    pub fn registry(&self) -> &WalletRegistry {
        &self.registry
    }

    /// 生成新助记词，返回短语原文
    pub fn generate_mnemonic(&mut self) -> Result<Zeroizing<String>, WalletError> {
        let mnemonic = self.manager.generate()?;
        Ok(Zeroizing::new(mnemonic.phrase().to_string()))
    }

    pub fn try_import_mnemonic(&mut self, phrase: &str) -> Result<(), WalletError> {
        self.manager.import(phrase)
    }

    /// 导入助记词；失败原因写入日志
    pub fn import_mnemonic(&mut self, phrase: &str) -> bool {
        match self.try_import_mnemonic(phrase) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(code = e.code(), "mnemonic import rejected: {}", e.user_message());
                false
            }
        }
    }

    pub fn clear_mnemonic(&mut self) -> Result<(), WalletError> {
        self.manager.clear()?;
        Ok(())
    }

    /// 新增钱包，错误渲染为可展示的消息
    pub fn add_wallet(&self, chain: ChainVariant) -> Result<WalletKey, String> {
        self.registry
            .add_wallet(chain, &self.manager)
            .map_err(|e| e.user_message())
    }

    pub fn delete_wallet(&self, chain: ChainVariant, position: usize) -> Result<(), WalletError> {
        self.registry.delete_wallet(chain, position)
    }

    pub fn regenerate_wallets(&self, chain: ChainVariant) -> Result<Vec<WalletKey>, WalletError> {
        Ok(self.registry.regenerate_all(chain, &self.manager)?)
    }

    pub fn regenerate_report(&self, chain: ChainVariant) -> Result<RegenerationReport, WalletError> {
        Ok(self.registry.regenerate_report(chain, &self.manager)?)
    }

    pub async fn regenerate_wallets_async(
        &self,
        chain: ChainVariant,
    ) -> Result<Vec<WalletKey>, WalletError> {
        Ok(self.registry.regenerate_all_async(chain, &self.manager).await?)
    }
}
