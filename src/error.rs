//! Error types for LedgerChain

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    InsufficientBalance {
        account: String,
        balance: String,
        amount: String,
    },
    UnknownAccount(String),
    InvalidTransaction(String),
    AmountOverflow(String),
    UnauthorizedValidator(String),
    InvalidBlock(String),
    StaleTail {
        expected: String,
        actual: String,
    },
    InsufficientTokens {
        owner: String,
        available: u64,
        requested: u64,
    },
    UnknownWallet(String),
    TokenOverflow(String),
    ConfigError(String),
    IoError(String),
}

impl ChainError {
    /// True for every "not enough funds" failure. A missing account or wallet
    /// counts as an empty one.
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(
            self,
            ChainError::InsufficientBalance { .. }
                | ChainError::UnknownAccount(_)
                | ChainError::InsufficientTokens { .. }
                | ChainError::UnknownWallet(_)
        )
    }
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::InsufficientBalance { account, balance, amount } => write!(
                f,
                "Insufficient balance: {} has {} but {} was requested",
                account, balance, amount
            ),
            ChainError::UnknownAccount(id) => write!(f, "Unknown account: {}", id),
            ChainError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {}", msg),
            ChainError::AmountOverflow(id) => write!(f, "Balance overflow on account: {}", id),
            ChainError::UnauthorizedValidator(id) => write!(f, "Unauthorized validator: {}", id),
            ChainError::InvalidBlock(msg) => write!(f, "Invalid block: {}", msg),
            ChainError::StaleTail { expected, actual } => write!(
                f,
                "Stale tail: expected {}, but the chain tail is {}",
                expected, actual
            ),
            ChainError::InsufficientTokens { owner, available, requested } => write!(
                f,
                "Insufficient tokens: {} has {} but {} was requested",
                owner, available, requested
            ),
            ChainError::UnknownWallet(owner) => write!(f, "Unknown wallet: {}", owner),
            ChainError::TokenOverflow(owner) => write!(f, "Token balance overflow for: {}", owner),
            ChainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ChainError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
