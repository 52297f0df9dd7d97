//! 地址编码与验证
//!
//! EIP-55 校验和编码，以及 Solana / Ethereum 地址格式校验

use sha3::{Digest, Keccak256};

use crate::domain::chain_config::{AddressFormat, ChainVariant};

/// 地址验证器
pub struct AddressValidator;

impl AddressValidator {
    /// 验证地址格式
    pub fn validate(chain: ChainVariant, address: &str) -> bool {
        match chain.address_format() {
            AddressFormat::ChecksumHex => Self::validate_evm_address(address),
            AddressFormat::SolanaBase58 => Self::validate_solana_address(address),
        }
    }

    /// 验证EVM地址（混合大小写时校验 EIP-55）
    fn validate_evm_address(address: &str) -> bool {
        let Some(hex_part) = address.strip_prefix("0x") else {
            return false;
        };

        if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return false;
        }

        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        if has_upper && has_lower {
            return verify_eip55_checksum(address);
        }

        true
    }

    /// 验证Solana地址（Base58编码，32字节）
    fn validate_solana_address(address: &str) -> bool {
        if address.len() < 32 || address.len() > 44 {
            return false;
        }

        match bs58::decode(address).into_vec() {
            Ok(decoded) => decoded.len() == 32,
            Err(_) => false,
        }
    }
}

/// EIP-55 校验和编码
/// https://eips.ethereum.org/EIPS/eip-55
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        if ch.is_ascii_alphabetic() && hash_nibble(&hash, i) >= 8 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// 验证 EIP-55 校验和
pub fn verify_eip55_checksum(address: &str) -> bool {
    let Some(hex_part) = address.strip_prefix("0x") else {
        return false;
    };

    let addr_lower = hex_part.to_ascii_lowercase();
    let hash = Keccak256::digest(addr_lower.as_bytes());

    hex_part.chars().enumerate().all(|(i, ch)| {
        if ch.is_ascii_alphabetic() {
            let should_be_uppercase = hash_nibble(&hash, i) >= 8;
            ch.is_ascii_uppercase() == should_be_uppercase
        } else {
            true
        }
    })
}

fn hash_nibble(hash: &[u8], i: usize) -> u8 {
    let byte = hash[i / 2];
    if i % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0f
    }
}
