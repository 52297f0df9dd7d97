//! 链标识符标准化模块
//!
//! 统一命令行参数、配置与持久化键名中的链标识符处理

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::domain::chain_config::ChainVariant;

/// 链标识符配置
#[derive(Debug, Clone)]
pub struct ChainIdentifier {
    pub chain: ChainVariant,
    /// 别名列表
    pub aliases: &'static [&'static str],
}

/// 链标识符注册表（静态初始化）
static CHAIN_REGISTRY: Lazy<HashMap<String, ChainVariant>> = Lazy::new(|| {
    let chains = vec![
        ChainIdentifier {
            chain: ChainVariant::Solana,
            aliases: &["solana", "Solana", "SOLANA", "sol", "SOL"],
        },
        ChainIdentifier {
            chain: ChainVariant::Ethereum,
            aliases: &["ethereum", "Ethereum", "ETHEREUM", "eth", "ETH"],
        },
    ];

    let mut registry = HashMap::new();
    for entry in chains {
        for alias in entry.aliases {
            registry.insert(alias.to_string(), entry.chain);
        }
        // coin type 也可作为标识符
        registry.insert(entry.chain.coin_type().to_string(), entry.chain);
    }

    registry
});

/// 标准化链标识符
///
/// 接受规范名、符号、别名或 coin type，返回对应的 [`ChainVariant`]。
///
/// ```rust
/// # use ironseed::utils::chain_normalizer::normalize_chain_identifier;
/// # use ironseed::domain::ChainVariant;
/// assert_eq!(normalize_chain_identifier("ETH").unwrap(), ChainVariant::Ethereum);
/// assert_eq!(normalize_chain_identifier("501").unwrap(), ChainVariant::Solana);
/// ```
pub fn normalize_chain_identifier(input: &str) -> anyhow::Result<ChainVariant> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        anyhow::bail!("Chain identifier cannot be empty");
    }

    CHAIN_REGISTRY
        .get(trimmed)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Unsupported chain identifier: {}", trimmed))
}
