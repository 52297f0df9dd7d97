//! 错误类型
//!
//! 派生、助记词、存储三类错误，以及面向调用方的统一 `WalletError`。
//! 每个错误都能渲染成一条可直接展示给用户的消息。

use thiserror::Error;

/// 密钥派生错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// 助记词未通过 BIP39 校验
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// 路径格式错误或与链的派生形状不符
    #[error("invalid derivation path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// 曲线/HMAC 运算拒绝了该 seed 与路径组合
    #[error("derivation failed at `{path}`: {reason}")]
    DerivationFailure { path: String, reason: String },
}

impl DerivationError {
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn failure(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::DerivationFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// 助记词生命周期错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MnemonicError {
    #[error("Please enter a seed phrase")]
    Empty,

    #[error("Invalid seed phrase. Please check and try again.")]
    InvalidMnemonic,

    /// 熵源不可用，不可恢复
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

/// 持久化存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// 对外统一错误
#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("No mnemonic found. Please generate a seed phrase first.")]
    NoMnemonic,
}

impl WalletError {
    /// 稳定的机器可读错误码
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::Mnemonic(MnemonicError::Empty) => "empty_phrase",
            WalletError::Mnemonic(MnemonicError::InvalidMnemonic) => "invalid_mnemonic",
            WalletError::Mnemonic(MnemonicError::EntropyUnavailable(_)) => "entropy_unavailable",
            WalletError::Derivation(DerivationError::InvalidMnemonic(_)) => "invalid_mnemonic",
            WalletError::Derivation(DerivationError::InvalidPath { .. }) => "invalid_path",
            WalletError::Derivation(DerivationError::DerivationFailure { .. }) => {
                "derivation_failure"
            }
            WalletError::Storage(_) => "storage_error",
            WalletError::NoMnemonic => "no_mnemonic",
        }
    }

    /// 单行、可直接展示的错误消息
    pub fn user_message(&self) -> String {
        match self {
            WalletError::Storage(_) => "Failed to save wallet data. Please try again.".to_string(),
            WalletError::Mnemonic(MnemonicError::EntropyUnavailable(_)) => {
                "Failed to generate seed phrase".to_string()
            }
            other => other.to_string(),
        }
    }
}
