//! Block production: package a transaction batch on top of the current tail.

use crate::blockchain::{Block, HashChain};
use crate::config::Config;
use crate::consensus::ValidatorRegistry;
use crate::economics::RewardPolicy;
use crate::error::ChainError;
use crate::transaction::Transaction;
use tracing::debug;

/// Builds candidate blocks for whitelisted validators.
///
/// Producing a block neither executes its transactions nor appends it nor
/// pays the reward; callers do that once the block is accepted.
#[derive(Debug, Clone)]
pub struct BlockProducer {
    registry: ValidatorRegistry,
    hash_chain: HashChain,
    rewards: RewardPolicy,
    payload_label: String,
}

impl BlockProducer {
    pub fn new(registry: ValidatorRegistry, hash_chain: HashChain, rewards: RewardPolicy) -> Self {
        Self {
            registry,
            hash_chain,
            rewards,
            payload_label: String::new(),
        }
    }

    pub fn with_payload_label(mut self, label: impl Into<String>) -> Self {
        self.payload_label = label.into();
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ValidatorRegistry::from_config(&config.validators),
            HashChain::new(config.chain.hash_scope),
            RewardPolicy::from_config(&config.rewards),
        )
        .with_payload_label(config.chain.block_label.clone())
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    pub fn hash_chain(&self) -> HashChain {
        self.hash_chain
    }

    pub fn rewards(&self) -> RewardPolicy {
        self.rewards
    }

    pub fn generate(
        &self,
        previous: &Block,
        transactions: &[Transaction],
        validator: &str,
    ) -> Result<Block, ChainError> {
        self.generate_at(previous, transactions, validator, Block::timestamp_now())
    }

    /// Same as [`generate`](Self::generate) with a caller-chosen timestamp.
    pub fn generate_at(
        &self,
        previous: &Block,
        transactions: &[Transaction],
        validator: &str,
        timestamp: impl Into<String>,
    ) -> Result<Block, ChainError> {
        self.registry.ensure_authorized(validator)?;

        let index = previous.index.checked_add(1).ok_or_else(|| {
            ChainError::InvalidBlock("Block index space exhausted.".to_string())
        })?;

        let mut block = Block {
            index,
            timestamp: timestamp.into(),
            payload: self.payload_label.clone(),
            hash: String::new(),
            previous_hash: previous.hash.clone(),
            transactions: transactions.to_vec(),
            validator: validator.to_string(),
            reward: self.rewards.block_reward,
        };
        block.hash = self.hash_chain.compute(&block);

        debug!(
            "Generated block {} ({}) with {} transactions for {}",
            block.index,
            block.hash,
            block.transactions.len(),
            validator
        );
        Ok(block)
    }
}
