//! 钱包派生策略
//!
//! 为不同的加密曲线提供统一的钱包派生接口：
//! 助记词 → BIP39 种子 → 按路径分层派生 → 链相关的地址与私钥编码。
//! 同一 (助记词, 口令, 路径) 永远得到同一密钥对。

use coins_bip32::prelude::*;
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use hmac::{Hmac, Mac};
use k256::ecdsa::SigningKey as K256SigningKey;
use sha2::Sha512;
use sha3::{Digest, Keccak256};
use zeroize::{Zeroize, Zeroizing};

use crate::{
    domain::{
        chain_config::{ChainVariant, CurveType},
        derivation_path::DerivationPath,
        mnemonic::Mnemonic,
        wallet_key::WalletKey,
    },
    error::DerivationError,
    utils::address_validator::to_checksum_address,
};

type HmacSha512 = Hmac<Sha512>;

/// 钱包派生策略 trait
pub trait DerivationStrategy: Send + Sync {
    /// 从 64 字节种子沿路径派生密钥对
    ///
    /// 调用方负责先按链校验路径形状。
    fn derive_key(&self, seed: &[u8], path: &DerivationPath) -> Result<WalletKey, DerivationError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Ed25519 策略 (Solana)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// SLIP-0010 ed25519 派生，仅支持硬化层级
pub struct Ed25519Strategy;

impl Ed25519Strategy {
    /// SLIP-0010 主密钥与逐层硬化派生，返回最终 32 字节私钥
    fn slip10_private_key(
        seed: &[u8],
        path: &DerivationPath,
    ) -> Result<Zeroizing<[u8; 32]>, DerivationError> {
        // I = HMAC-SHA512(Key = "ed25519 seed", Data = seed)
        let (mut key, mut chain_code) = Self::hmac_split(path, b"ed25519 seed", &[seed])?;

        for segment in path.segments() {
            if !segment.hardened {
                return Err(DerivationError::invalid_path(
                    path.as_str(),
                    "ed25519 derivation requires every component to be hardened",
                ));
            }
            // Z = HMAC-SHA512(Key = c, Data = 0x00 || k || ser32(i'))
            let index = segment.child_number().to_be_bytes();
            let (child_key, child_chain_code) =
                Self::hmac_split(path, &chain_code[..], &[&[0x00u8][..], &key[..], &index[..]])?;
            key = child_key;
            chain_code = child_chain_code;
        }

        Ok(key)
    }

    fn hmac_split(
        path: &DerivationPath,
        hmac_key: &[u8],
        data: &[&[u8]],
    ) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>), DerivationError> {
        let mut mac = HmacSha512::new_from_slice(hmac_key)
            .map_err(|e| DerivationError::failure(path.as_str(), e))?;
        for chunk in data {
            mac.update(chunk);
        }
        let mut result = mac.finalize().into_bytes();

        let mut left = Zeroizing::new([0u8; 32]);
        let mut right = Zeroizing::new([0u8; 32]);
        left.copy_from_slice(&result[..32]);
        right.copy_from_slice(&result[32..]);
        result[..].zeroize();
        Ok((left, right))
    }
}

impl DerivationStrategy for Ed25519Strategy {
    fn derive_key(&self, seed: &[u8], path: &DerivationPath) -> Result<WalletKey, DerivationError> {
        let private_key = Self::slip10_private_key(seed, path)?;

        let signing_key = Ed25519SigningKey::from_bytes(&private_key);
        let public_key_bytes = signing_key.verifying_key().to_bytes();

        // Solana 私钥格式：secret(32) || public(32)
        let keypair_bytes = Zeroizing::new(signing_key.to_keypair_bytes());

        Ok(WalletKey {
            public_address: bs58::encode(public_key_bytes).into_string(),
            secret_material: Zeroizing::new(bs58::encode(&keypair_bytes[..]).into_string()),
            path: path.clone(),
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Secp256k1 策略 (Ethereum)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// BIP32 secp256k1 派生，支持硬化与普通层级
pub struct Secp256k1Strategy;

impl DerivationStrategy for Secp256k1Strategy {
    fn derive_key(&self, seed: &[u8], path: &DerivationPath) -> Result<WalletKey, DerivationError> {
        let master_key = XPriv::root_from_seed(seed, None)
            .map_err(|e| DerivationError::failure(path.as_str(), e))?;

        // 子密钥无效时报错，不跳到下一个索引
        let mut derived_key = master_key;
        for segment in path.segments() {
            derived_key = derived_key
                .derive_child(segment.child_number())
                .map_err(|e| DerivationError::failure(path.as_str(), e))?;
        }

        let signing_key: &K256SigningKey = derived_key.as_ref();
        let mut private_key_bytes = Zeroizing::new([0u8; 32]);
        private_key_bytes.copy_from_slice(&signing_key.to_bytes());

        // 未压缩公钥去掉 0x04 前缀后做 Keccak256，取后 20 字节
        let public_key = signing_key.verifying_key().to_encoded_point(false);
        let hash = Keccak256::digest(&public_key.as_bytes()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);

        Ok(WalletKey {
            public_address: to_checksum_address(&address),
            secret_material: Zeroizing::new(format!("0x{}", hex::encode(&private_key_bytes[..]))),
            path: path.clone(),
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 策略工厂
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 策略工厂
pub struct DerivationStrategyFactory;

impl DerivationStrategyFactory {
    /// 根据曲线类型创建策略
    pub fn create_strategy(curve_type: CurveType) -> Box<dyn DerivationStrategy> {
        match curve_type {
            CurveType::Secp256k1 => Box::new(Secp256k1Strategy),
            CurveType::Ed25519 => Box::new(Ed25519Strategy),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 派生引擎
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 密钥派生引擎
///
/// 只持有 BIP39 口令配置，没有其他状态。
#[derive(Clone, Default)]
pub struct DerivationEngine {
    passphrase: Zeroizing<String>,
}

impl DerivationEngine {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }

    /// 为链派生指定路径的密钥对
    pub fn derive(
        &self,
        chain: ChainVariant,
        mnemonic: &Mnemonic,
        path: &DerivationPath,
    ) -> Result<WalletKey, DerivationError> {
        path.validate_for(chain)?;

        let seed = mnemonic.to_seed(&self.passphrase);
        let strategy = DerivationStrategyFactory::create_strategy(chain.curve_type());
        let key = strategy.derive_key(&seed[..], path)?;

        tracing::debug!(chain = %chain, path = %path, address = %key.public_address, "derived wallet key");
        Ok(key)
    }

    /// 字符串入口：未通过校验的助记词返回 `InvalidMnemonic`，不会生成密钥
    pub fn derive_from_phrase(
        &self,
        chain: ChainVariant,
        phrase: &str,
        path: &str,
    ) -> Result<WalletKey, DerivationError> {
        let mnemonic = Mnemonic::parse(phrase)
            .map_err(|e| DerivationError::InvalidMnemonic(e.to_string()))?;
        let path = DerivationPath::parse(path)?;
        self.derive(chain, &mnemonic, &path)
    }

    /// 在阻塞线程池中派生，避免占用交互线程
    pub async fn derive_task(
        &self,
        chain: ChainVariant,
        mnemonic: Mnemonic,
        path: DerivationPath,
    ) -> Result<WalletKey, DerivationError> {
        let engine = self.clone();
        let raw_path = path.as_str().to_string();

        tokio::task::spawn_blocking(move || engine.derive(chain, &mnemonic, &path))
            .await
            .map_err(|e| DerivationError::failure(raw_path, e))?
    }
}
