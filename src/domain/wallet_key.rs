//! 派生出的钱包密钥
//!
//! 从不单独持久化；任何时候都可以由 (助记词, 路径) 重建。

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::domain::derivation_path::DerivationPath;

/// 钱包密钥对
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct WalletKey {
    /// 公开地址
    #[serde(rename = "public")]
    pub public_address: String,
    /// 私钥材料（Solana: base58(secret ‖ public)，Ethereum: 0x 前缀十六进制）
    #[serde(rename = "secret", serialize_with = "serialize_secret")]
    pub secret_material: Zeroizing<String>,
    pub path: DerivationPath,
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Zeroizing<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret)
}

impl WalletKey {
    pub fn secret(&self) -> &str {
        &self.secret_material
    }
}

impl fmt::Debug for WalletKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletKey")
            .field("public_address", &self.public_address)
            .field("secret_material", &"[REDACTED]")
            .field("path", &self.path.as_str())
            .finish()
    }
}
