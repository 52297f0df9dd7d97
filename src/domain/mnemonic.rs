//! BIP39 助记词
//!
//! `Mnemonic` 只能通过解析或生成得到，因此任何 `Mnemonic` 值都通过了校验和检查。

use std::fmt;

use bip39::Language;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::MnemonicError;

/// 助记词长度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum WordCount {
    /// 128 bit 熵
    #[default]
    Twelve,
    /// 256 bit 熵
    TwentyFour,
}

impl WordCount {
    pub fn entropy_bytes(self) -> usize {
        match self {
            WordCount::Twelve => 16,
            WordCount::TwentyFour => 32,
        }
    }

    pub fn words(self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::TwentyFour => 24,
        }
    }
}

impl TryFrom<usize> for WordCount {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            12 => Ok(WordCount::Twelve),
            24 => Ok(WordCount::TwentyFour),
            other => Err(format!("Invalid word count {}, must be 12 or 24", other)),
        }
    }
}

impl From<WordCount> for usize {
    fn from(value: WordCount) -> Self {
        value.words()
    }
}

/// 已校验的助记词
#[derive(Clone)]
pub struct Mnemonic {
    inner: bip39::Mnemonic,
    phrase: Zeroizing<String>,
}

impl Mnemonic {
    /// 校验助记词：词表、校验和，以及单空格分隔
    ///
    /// 分隔要求保证原样保存的短语与 BIP39 规范化形式一致，种子可复现。
    pub fn validate(phrase: &str) -> bool {
        let well_spaced = !phrase.is_empty()
            && phrase
                .split(' ')
                .all(|w| !w.is_empty() && !w.chars().any(char::is_whitespace));

        well_spaced && bip39::Mnemonic::parse_in(Language::English, phrase).is_ok()
    }

    /// 解析助记词，原样保存
    pub fn parse(phrase: &str) -> Result<Self, MnemonicError> {
        if phrase.is_empty() {
            return Err(MnemonicError::Empty);
        }
        if !Self::validate(phrase) {
            return Err(MnemonicError::InvalidMnemonic);
        }

        let inner = bip39::Mnemonic::parse_in(Language::English, phrase)
            .map_err(|_| MnemonicError::InvalidMnemonic)?;

        Ok(Self {
            inner,
            phrase: Zeroizing::new(phrase.to_string()),
        })
    }

    /// 使用系统熵源生成新助记词
    pub fn generate(word_count: WordCount) -> Result<Self, MnemonicError> {
        let mut entropy = Zeroizing::new(vec![0u8; word_count.entropy_bytes()]);
        OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|e| MnemonicError::EntropyUnavailable(e.to_string()))?;

        let inner = bip39::Mnemonic::from_entropy_in(Language::English, &entropy)
            .map_err(|e| MnemonicError::EntropyUnavailable(e.to_string()))?;
        let phrase = Zeroizing::new(inner.to_string());

        Ok(Self { inner, phrase })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.inner.word_count()
    }

    /// BIP39 种子拉伸（PBKDF2-HMAC-SHA512, 2048 轮），返回 64 字节种子
    pub fn to_seed(&self, passphrase: &str) -> Zeroizing<[u8; 64]> {
        Zeroizing::new(self.inner.to_seed(passphrase))
    }
}

impl PartialEq for Mnemonic {
    fn eq(&self, other: &Self) -> bool {
        *self.phrase == *other.phrase
    }
}

impl Eq for Mnemonic {}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &self.word_count())
            .finish_non_exhaustive()
    }
}
