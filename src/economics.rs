//! Economics module: validator rewards and the token ledger they are paid into.
//!
//! Token balances live apart from account balances. Wallets are created on the
//! first credit and never deleted.

use crate::config::RewardConfig;
use crate::error::ChainError;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

/// Tokens paid for each accepted block when nothing else is configured.
pub const DEFAULT_BLOCK_REWARD: u64 = 1;

/// Flat per-block reward. Not derived from transaction volume or fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardPolicy {
    pub block_reward: u64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            block_reward: DEFAULT_BLOCK_REWARD,
        }
    }
}

impl RewardPolicy {
    pub fn new(block_reward: u64) -> Self {
        Self { block_reward }
    }

    pub fn from_config(config: &RewardConfig) -> Self {
        Self::new(config.block_reward)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wallet {
    pub owner: String,
    pub tokens: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    wallets: HashMap<String, Wallet>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wallet(&self, owner: &str) -> Option<&Wallet> {
        self.wallets.get(owner)
    }

    /// Token balance of `owner`, zero when no wallet exists yet.
    pub fn balance(&self, owner: &str) -> u64 {
        self.wallets.get(owner).map_or(0, |w| w.tokens)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn total_supply(&self) -> u128 {
        self.wallets.values().map(|w| u128::from(w.tokens)).sum()
    }

    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.wallets
            .values()
            .map(|w| (w.owner.clone(), w.tokens))
            .collect()
    }

    /// Fails only if `amount` would overflow the owner's balance.
    pub fn can_credit(&self, owner: &str, amount: u64) -> Result<(), ChainError> {
        self.balance(owner)
            .checked_add(amount)
            .map(|_| ())
            .ok_or_else(|| ChainError::TokenOverflow(owner.to_string()))
    }

    /// Add `amount` tokens to `owner`, opening the wallet if needed.
    pub fn credit(&mut self, owner: &str, amount: u64) -> Result<(), ChainError> {
        self.can_credit(owner, amount)?;
        let wallet = self
            .wallets
            .entry(owner.to_string())
            .or_insert_with(|| Wallet {
                owner: owner.to_string(),
                tokens: 0,
            });
        wallet.tokens += amount;
        info!("Credited {} tokens to {} (balance {})", amount, owner, wallet.tokens);
        Ok(())
    }

    /// Move tokens between wallets. Nothing changes unless the whole transfer succeeds.
    pub fn try_transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<(), ChainError> {
        let available = self
            .wallets
            .get(from)
            .map(|w| w.tokens)
            .ok_or_else(|| ChainError::UnknownWallet(from.to_string()))?;

        if available < amount {
            return Err(ChainError::InsufficientTokens {
                owner: from.to_string(),
                available,
                requested: amount,
            });
        }

        if from == to {
            return Ok(());
        }

        self.can_credit(to, amount)?;

        if let Some(wallet) = self.wallets.get_mut(from) {
            wallet.tokens = available - amount;
        }
        self.credit(to, amount)?;
        info!("Transferred {} tokens from {} to {}", amount, from, to);
        Ok(())
    }

    pub fn transfer(&mut self, from: &str, to: &str, amount: u64) -> bool {
        match self.try_transfer(from, to, amount) {
            Ok(()) => true,
            Err(e) => {
                warn!("Token transfer failed: {}", e);
                false
            }
        }
    }
}
