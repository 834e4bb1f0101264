use crate::config::ChainConfig;
use crate::error::ChainError;
use crate::transaction::Transaction;
use serde::Serialize;
use tracing::{info, warn};

use super::validation::HashChain;

pub const DEFAULT_GENESIS_LABEL: &str = "Genesis Block";

/// A sealed batch. Fields are public for building and inspecting blocks;
/// once appended, a block is only reachable through `&Block` or an owned
/// clone (`Chain::snapshot`, `LedgerNode::chain`), so the chain's copy never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String,
    pub payload: String,
    pub hash: String,
    /// Empty for the genesis block.
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
    pub validator: String,
    pub reward: u64,
}

impl Block {
    /// Build the first block of a chain: no predecessor, no transactions, no validator.
    pub fn genesis(
        payload: impl Into<String>,
        timestamp: impl Into<String>,
        hash_chain: &HashChain,
    ) -> Self {
        let mut block = Block {
            index: 0,
            timestamp: timestamp.into(),
            payload: payload.into(),
            hash: String::new(),
            previous_hash: String::new(),
            transactions: Vec::new(),
            validator: String::new(),
            reward: 0,
        };
        block.hash = hash_chain.compute(&block);
        block
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash.is_empty()
    }

    /// Current wall-clock time in the format blocks carry.
    pub fn timestamp_now() -> String {
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
    }
}

/// The ordered sequence of accepted blocks. Never empty: it starts at genesis.
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
    hash_chain: HashChain,
}

#[allow(clippy::len_without_is_empty)]
impl Chain {
    pub fn new(genesis: Block, hash_chain: HashChain) -> Result<Self, ChainError> {
        hash_chain.validate_genesis(&genesis)?;
        Ok(Chain {
            blocks: vec![genesis],
            hash_chain,
        })
    }

    pub fn from_config(config: &ChainConfig) -> Result<Self, ChainError> {
        let hash_chain = HashChain::new(config.hash_scope);
        let timestamp = config
            .genesis_timestamp
            .clone()
            .unwrap_or_else(Block::timestamp_now);
        let genesis = Block::genesis(config.genesis_label.clone(), timestamp, &hash_chain);
        Self::new(genesis, hash_chain)
    }

    pub fn hash_chain(&self) -> HashChain {
        self.hash_chain
    }

    pub fn tail(&self) -> &Block {
        // `new` seeds the sequence with genesis and nothing ever removes blocks.
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    /// Owned copy of the whole sequence for callers outside the lock.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    /// Append `candidate` if it validly extends the current tail.
    /// On error the chain is left exactly as it was.
    pub fn try_append(&mut self, candidate: Block) -> Result<(), ChainError> {
        if let Err(e) = self.hash_chain.validate(&candidate, self.tail()) {
            warn!("Rejected block {} from {}: {}", candidate.index, candidate.validator, e);
            return Err(e);
        }

        info!(
            "Accepted block {} ({}) from validator {}",
            candidate.index, candidate.hash, candidate.validator
        );
        self.blocks.push(candidate);
        Ok(())
    }

    pub fn append(&mut self, candidate: Block) -> bool {
        self.try_append(candidate).is_ok()
    }

    /// Append only if the tail is still the block the candidate was built on.
    pub fn compare_and_append(
        &mut self,
        expected_tail_hash: &str,
        candidate: Block,
    ) -> Result<(), ChainError> {
        let tail_hash = &self.tail().hash;
        if tail_hash != expected_tail_hash {
            warn!(
                "Stale tail for block {}: built on {}, tail is {}",
                candidate.index, expected_tail_hash, tail_hash
            );
            return Err(ChainError::StaleTail {
                expected: expected_tail_hash.to_string(),
                actual: tail_hash.clone(),
            });
        }
        self.try_append(candidate)
    }

    /// Re-check genesis and every link in the sequence.
    pub fn verify(&self) -> Result<(), ChainError> {
        self.hash_chain.validate_genesis(&self.blocks[0])?;
        for pair in self.blocks.windows(2) {
            self.hash_chain.validate(&pair[1], &pair[0])?;
        }
        Ok(())
    }
}
