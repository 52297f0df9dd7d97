//! 助记词生命周期管理
//!
//! 状态机：`Uninitialized → init() → Empty | Ready`。
//! 同一时刻最多持有一个助记词，持久化值与内存状态保持一致。

use std::sync::Arc;

use crate::{
    domain::mnemonic::{Mnemonic, WordCount},
    error::{StorageError, WalletError},
    infrastructure::storage::{is_registry_key, KeyValueStore, MNEMONIC_KEY},
};

/// 助记词状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MnemonicState {
    /// 尚未读取存储
    Uninitialized,
    /// 无助记词
    Empty,
    /// 已加载有效助记词
    Ready(Mnemonic),
}

/// 助记词管理器
pub struct MnemonicManager {
    store: Arc<dyn KeyValueStore>,
    word_count: WordCount,
    state: MnemonicState,
}

impl MnemonicManager {
    pub fn new(store: Arc<dyn KeyValueStore>, word_count: WordCount) -> Self {
        Self {
            store,
            word_count,
            state: MnemonicState::Uninitialized,
        }
    }

    /// 创建并立即从存储加载
    pub fn load(store: Arc<dyn KeyValueStore>, word_count: WordCount) -> Result<Self, StorageError> {
        let mut manager = Self::new(store, word_count);
        manager.init()?;
        Ok(manager)
    }

    /// 读取持久化的助记词
    ///
    /// 存储中的短语未通过校验时按 `Empty` 处理，不会删除原值。
    pub fn init(&mut self) -> Result<&MnemonicState, StorageError> {
        self.state = match self.store.get(MNEMONIC_KEY)? {
            None => MnemonicState::Empty,
            Some(phrase) if phrase.is_empty() => MnemonicState::Empty,
            Some(phrase) => match Mnemonic::parse(&phrase) {
                Ok(mnemonic) => MnemonicState::Ready(mnemonic),
                Err(e) => {
                    tracing::warn!(error = %e, "persisted mnemonic failed validation, treating as empty");
                    MnemonicState::Empty
                }
            },
        };

        tracing::debug!(ready = self.has_mnemonic(), "mnemonic state loaded");
        Ok(&self.state)
    }

    /// 生成新助记词并替换旧值；已保存的路径列表不受影响
    pub fn generate(&mut self) -> Result<Mnemonic, WalletError> {
        let mnemonic = Mnemonic::generate(self.word_count)?;
        self.store.set(MNEMONIC_KEY, mnemonic.phrase())?;

        tracing::info!(words = mnemonic.word_count(), "generated new mnemonic");
        self.state = MnemonicState::Ready(mnemonic.clone());
        Ok(mnemonic)
    }

    /// 纯校验，不修改状态
    pub fn validate(phrase: &str) -> bool {
        Mnemonic::validate(phrase)
    }

    /// 导入助记词（去除首尾空白后原样保存）
    ///
    /// 失败时状态与存储都保持不变。
    pub fn import(&mut self, phrase: &str) -> Result<(), WalletError> {
        let mnemonic = Mnemonic::parse(phrase.trim())?;
        self.store.set(MNEMONIC_KEY, mnemonic.phrase())?;

        tracing::info!(words = mnemonic.word_count(), "imported mnemonic");
        self.state = MnemonicState::Ready(mnemonic);
        Ok(())
    }

    /// 清除助记词以及所有链的钱包路径
    ///
    /// 先删路径列表，最后删助记词：中途失败时不会留下没有助记词的路径。
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let wallet_keys: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter(|k| is_registry_key(k))
            .collect();
        for key in &wallet_keys {
            self.store.remove(key)?;
        }

        self.store.remove(MNEMONIC_KEY)?;
        self.state = MnemonicState::Empty;

        tracing::info!(removed_wallet_entries = wallet_keys.len(), "cleared mnemonic and wallets");
        Ok(())
    }

    pub fn state(&self) -> &MnemonicState {
        &self.state
    }

    pub fn mnemonic(&self) -> Option<&Mnemonic> {
        match &self.state {
            MnemonicState::Ready(mnemonic) => Some(mnemonic),
            _ => None,
        }
    }

    pub fn has_mnemonic(&self) -> bool {
        matches!(self.state, MnemonicState::Ready(_))
    }

    pub fn word_count(&self) -> WordCount {
        self.word_count
    }
}
