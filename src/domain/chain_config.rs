//! 多链配置模块
//!
//! 定义支持的区块链及其加密曲线、coin type 与存储标识

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::utils::chain_normalizer;

/// 加密曲线类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// secp256k1 曲线 (Ethereum)
    Secp256k1,
    /// ed25519 曲线 (Solana)
    Ed25519,
}

/// 地址编码格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFormat {
    /// EIP-55 校验和十六进制 0x...
    ChecksumHex,
    /// Base58 公钥 (Solana)
    SolanaBase58,
}

/// 支持的链（封闭枚举，新增链时所有 match 会在编译期报错）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainVariant {
    Solana,
    Ethereum,
}

impl ChainVariant {
    pub const ALL: [ChainVariant; 2] = [ChainVariant::Solana, ChainVariant::Ethereum];

    /// SLIP-44 coin type
    pub fn coin_type(self) -> u32 {
        match self {
            ChainVariant::Solana => 501,
            ChainVariant::Ethereum => 60,
        }
    }

    pub fn curve_type(self) -> CurveType {
        match self {
            ChainVariant::Solana => CurveType::Ed25519,
            ChainVariant::Ethereum => CurveType::Secp256k1,
        }
    }

    pub fn address_format(self) -> AddressFormat {
        match self {
            ChainVariant::Solana => AddressFormat::SolanaBase58,
            ChainVariant::Ethereum => AddressFormat::ChecksumHex,
        }
    }

    /// 小写规范名，用于持久化键名
    pub fn slug(self) -> &'static str {
        match self {
            ChainVariant::Solana => "solana",
            ChainVariant::Ethereum => "ethereum",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChainVariant::Solana => "Solana",
            ChainVariant::Ethereum => "Ethereum",
        }
    }

    /// 根据 coin type 反查链（路径校验工具使用）
    pub fn from_coin_type(coin_type: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.coin_type() == coin_type)
    }
}

impl fmt::Display for ChainVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ChainVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        chain_normalizer::normalize_chain_identifier(s)
    }
}
