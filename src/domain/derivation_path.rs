//! BIP44 派生路径
//!
//! 路径分配器：`(chain, index) -> m/44'/<coin>'/<index>'/0'`，以及把路径字符串
//! 解析回 `(coin_type, index)` 并按链校验派生形状。

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{domain::chain_config::ChainVariant, error::DerivationError};

/// 硬化索引偏移量 2^31
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// BIP44 purpose
pub const BIP44_PURPOSE: u32 = 44;

/// 路径中的单个层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathSegment {
    /// 未加偏移的索引值（< 2^31）
    pub index: u32,
    pub hardened: bool,
}

impl PathSegment {
    pub fn hardened(index: u32) -> Self {
        Self {
            index,
            hardened: true,
        }
    }

    pub fn normal(index: u32) -> Self {
        Self {
            index,
            hardened: false,
        }
    }

    /// BIP32 子索引（硬化时加上 2^31）
    pub fn child_number(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

/// 派生路径
///
/// 原始字符串原样保存，持久化与重新派生都使用同一字符串。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    raw: String,
    segments: Vec<PathSegment>,
}

/// 为链分配第 `index` 个钱包的路径
///
/// 有效的 `index` 范围为 `0..2^31`；超出范围的路径无法通过 [`DerivationPath::validate_for`]，
/// 派生时返回 `InvalidPath`。
pub fn allocate(chain: ChainVariant, index: u32) -> DerivationPath {
    let segments = vec![
        PathSegment::hardened(BIP44_PURPOSE),
        PathSegment::hardened(chain.coin_type()),
        PathSegment::hardened(index),
        PathSegment::hardened(0),
    ];
    DerivationPath {
        raw: format!("m/44'/{}'/{}'/0'", chain.coin_type(), index),
        segments,
    }
}

impl DerivationPath {
    /// 解析路径字符串
    ///
    /// 支持 `'`、`h`、`H` 作为硬化标记。
    pub fn parse(path: &str) -> Result<Self, DerivationError> {
        let mut parts = path.split('/');

        match parts.next() {
            Some("m") | Some("M") => {}
            _ => return Err(DerivationError::invalid_path(path, "path must start with 'm/'")),
        }

        let mut segments = Vec::new();
        for part in parts {
            segments.push(Self::parse_segment(path, part)?);
        }

        if segments.is_empty() {
            return Err(DerivationError::invalid_path(
                path,
                "path must have at least one component",
            ));
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    fn parse_segment(path: &str, part: &str) -> Result<PathSegment, DerivationError> {
        let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
            Some(stripped) => (stripped, true),
            None => (part, false),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DerivationError::invalid_path(
                path,
                format!("invalid path component `{}`", part),
            ));
        }

        let index: u32 = digits.parse().map_err(|_| {
            DerivationError::invalid_path(path, format!("path component `{}` out of range", part))
        })?;

        if index >= HARDENED_OFFSET {
            return Err(DerivationError::invalid_path(
                path,
                format!("path component `{}` exceeds 2^31 - 1", part),
            ));
        }

        Ok(PathSegment { index, hardened })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// 第二层 coin type（如存在）
    pub fn coin_type(&self) -> Option<u32> {
        self.segments.get(1).map(|s| s.index)
    }

    /// 第三层账户索引，即分配器写入的钱包序号
    pub fn account_index(&self) -> Option<u32> {
        self.segments.get(2).map(|s| s.index)
    }

    /// 解析回 `(coin_type, index)`
    pub fn components(&self) -> Option<(u32, u32)> {
        Some((self.coin_type()?, self.account_index()?))
    }

    /// 按链校验路径形状
    ///
    /// - Solana: `44'/501'/a'[/c']`，全部硬化（SLIP-0010 ed25519 不支持普通派生）
    /// - Ethereum: `44'/60'/a'/c[/i]`，前三层硬化，后续层级不限
    pub fn validate_for(&self, chain: ChainVariant) -> Result<(), DerivationError> {
        let segs = &self.segments;

        // 硬化时 2^31 以上的索引会与 0' 等索引重叠
        if let Some(seg) = segs.iter().find(|s| s.index >= HARDENED_OFFSET) {
            return Err(DerivationError::invalid_path(
                &self.raw,
                format!("path component `{}` exceeds 2^31 - 1", seg.index),
            ));
        }

        if segs[0] != PathSegment::hardened(BIP44_PURPOSE) {
            return Err(DerivationError::invalid_path(
                &self.raw,
                "first component must be 44' (BIP44)",
            ));
        }

        match segs.get(1) {
            Some(seg) if *seg == PathSegment::hardened(chain.coin_type()) => {}
            _ => {
                return Err(DerivationError::invalid_path(
                    &self.raw,
                    format!("coin type must be {}' for {}", chain.coin_type(), chain),
                ))
            }
        }

        match chain {
            ChainVariant::Solana => {
                if !(3..=4).contains(&segs.len()) {
                    return Err(DerivationError::invalid_path(
                        &self.raw,
                        "solana paths have 3 or 4 components",
                    ));
                }
                if segs.iter().any(|s| !s.hardened) {
                    return Err(DerivationError::invalid_path(
                        &self.raw,
                        "ed25519 derivation requires every component to be hardened",
                    ));
                }
            }
            ChainVariant::Ethereum => {
                if !(4..=5).contains(&segs.len()) {
                    return Err(DerivationError::invalid_path(
                        &self.raw,
                        "ethereum paths have 4 or 5 components",
                    ));
                }
                if !segs[2].hardened {
                    return Err(DerivationError::invalid_path(
                        &self.raw,
                        "account component must be hardened",
                    ));
                }
            }
        }

        Ok(())
    }

    /// 解析并按链校验
    pub fn parse_for(chain: ChainVariant, path: &str) -> Result<Self, DerivationError> {
        let parsed = Self::parse(path)?;
        parsed.validate_for(chain)?;
        Ok(parsed)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for DerivationPath {
    type Err = DerivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DerivationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for DerivationPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_allocate_canonical_form() {
        assert_eq!(allocate(ChainVariant::Solana, 2).as_str(), "m/44'/501'/2'/0'");
        assert_eq!(allocate(ChainVariant::Ethereum, 2).as_str(), "m/44'/60'/2'/0'");
        assert_eq!(allocate(ChainVariant::Solana, 0).as_str(), "m/44'/501'/0'/0'");
    }

    #[test]
    fn test_allocate_is_injective() {
        for chain in ChainVariant::ALL {
            let paths: HashSet<String> = (0..500)
                .map(|i| allocate(chain, i).as_str().to_string())
                .collect();
            assert_eq!(paths.len(), 500);
        }
    }

    #[test]
    fn test_allocate_matches_parse() {
        for chain in ChainVariant::ALL {
            for i in [0u32, 1, 7, 1000, HARDENED_OFFSET - 1] {
                let allocated = allocate(chain, i);
                let parsed = DerivationPath::parse_for(chain, allocated.as_str()).unwrap();
                assert_eq!(parsed, allocated);
                assert_eq!(parsed.components(), Some((chain.coin_type(), i)));
            }
        }
    }

    #[test]
    fn test_allocate_out_of_range_index_fails_validation() {
        for chain in ChainVariant::ALL {
            for i in [HARDENED_OFFSET, HARDENED_OFFSET + 1, u32::MAX] {
                let path = allocate(chain, i);
                let err = path.validate_for(chain).unwrap_err();
                assert!(matches!(err, DerivationError::InvalidPath { .. }), "{}", path);
            }
        }
        assert!(allocate(ChainVariant::Solana, HARDENED_OFFSET - 1)
            .validate_for(ChainVariant::Solana)
            .is_ok());
    }

    #[test]
    fn test_parse_hardened_markers() {
        let a = DerivationPath::parse("m/44'/60'/0'/0'").unwrap();
        let b = DerivationPath::parse("m/44h/60h/0h/0h").unwrap();
        assert_eq!(a.segments(), b.segments());
        assert_eq!(a.segments()[1].child_number(), 0x8000_003C);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "44'/60'/0'/0'",
            "m",
            "m/",
            "m//0'",
            "m/44'/abc'/0'",
            "m/44'/60'/-1'/0'",
            "m/44'/60'/2147483648'/0'",
            "m/44'/60'/ 0'/0'",
        ] {
            let err = DerivationPath::parse(bad).unwrap_err();
            assert!(matches!(err, DerivationError::InvalidPath { .. }), "{}", bad);
        }
    }

    #[test]
    fn test_validate_solana_shape() {
        assert!(DerivationPath::parse_for(ChainVariant::Solana, "m/44'/501'/0'").is_ok());
        assert!(DerivationPath::parse_for(ChainVariant::Solana, "m/44'/501'/3'/0'").is_ok());
        // 非硬化层级
        assert!(DerivationPath::parse_for(ChainVariant::Solana, "m/44'/501'/0'/0").is_err());
        // coin type 不匹配
        assert!(DerivationPath::parse_for(ChainVariant::Solana, "m/44'/60'/0'/0'").is_err());
        // purpose 错误
        assert!(DerivationPath::parse_for(ChainVariant::Solana, "m/84'/501'/0'/0'").is_err());
    }

    #[test]
    fn test_validate_ethereum_shape() {
        assert!(DerivationPath::parse_for(ChainVariant::Ethereum, "m/44'/60'/0'/0'").is_ok());
        assert!(DerivationPath::parse_for(ChainVariant::Ethereum, "m/44'/60'/0'/0/0").is_ok());
        assert!(DerivationPath::parse_for(ChainVariant::Ethereum, "m/44'/60'/0'").is_err());
        assert!(DerivationPath::parse_for(ChainVariant::Ethereum, "m/44'/60'/0/0/0").is_err());
        assert!(DerivationPath::parse_for(ChainVariant::Ethereum, "m/44'/501'/0'/0'").is_err());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let path = allocate(ChainVariant::Ethereum, 5);
        let json = serde_json::to_string(&vec![path.clone()]).unwrap();
        assert_eq!(json, r#"["m/44'/60'/5'/0'"]"#);

        let back: Vec<DerivationPath> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![path]);
    }
}
