//! A ledger node: wires the producer, account ledger, chain and token ledger
//! into one batch pipeline that is safe to share between threads.

use crate::blockchain::{Block, Chain, ExecutionReport, Ledger};
use crate::config::Config;
use crate::economics::TokenLedger;
use crate::error::ChainError;
use crate::producer::BlockProducer;
use crate::transaction::{Amount, Transaction};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a batch that made it into the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReceipt {
    pub block: Block,
    pub report: ExecutionReport,
    pub reward: u64,
}

struct NodeInner {
    producer: BlockProducer,
    // Lock order: chain, then ledger, then tokens.
    chain: RwLock<Chain>,
    ledger: Mutex<Ledger>,
    tokens: Mutex<TokenLedger>,
}

/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct LedgerNode {
    inner: Arc<NodeInner>,
}

impl LedgerNode {
    pub fn new(producer: BlockProducer, chain: Chain, ledger: Ledger) -> Result<Self, ChainError> {
        if producer.hash_chain() != chain.hash_chain() {
            return Err(ChainError::ConfigError(
                "producer and chain must use the same hash scope".to_string(),
            ));
        }

        Ok(Self {
            inner: Arc::new(NodeInner {
                producer,
                chain: RwLock::new(chain),
                ledger: Mutex::new(ledger),
                tokens: Mutex::new(TokenLedger::new()),
            }),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ChainError> {
        config.validate()?;
        let node = Self::new(
            BlockProducer::from_config(config),
            Chain::from_config(&config.chain)?,
            Ledger::with_accounts(config.initial_balances()?),
        )?;
        info!(
            "Node ready: {} accounts, {} validators, reward {} per block",
            config.accounts.len(),
            node.inner.producer.registry().len(),
            node.inner.producer.rewards().block_reward
        );
        Ok(node)
    }

    pub fn producer(&self) -> &BlockProducer {
        &self.inner.producer
    }

    /// Produce, execute and append one batch, then pay the validator.
    ///
    /// The chain write lock is held for the whole step, so the block is always
    /// built on the tail it is appended to. If the validator is not authorized
    /// or the block is rejected, no balance, block or wallet changes.
    pub fn submit_batch(
        &self,
        transactions: Vec<Transaction>,
        validator: &str,
    ) -> Result<BatchReceipt, ChainError> {
        let mut chain = self.inner.chain.write();

        let block = self
            .inner
            .producer
            .generate(chain.tail(), &transactions, validator)?;
        chain.hash_chain().validate(&block, chain.tail()).map_err(|e| {
            warn!("Produced block {} does not extend the tail: {}", block.index, e);
            e
        })?;

        let mut ledger = self.inner.ledger.lock();
        let mut tokens = self.inner.tokens.lock();
        tokens.can_credit(validator, block.reward)?;

        let report = ledger.execute(&transactions);
        chain.try_append(block.clone())?;
        tokens.credit(validator, block.reward)?;

        info!(
            "Block {} sealed by {}: {} ok, {} failed",
            block.index,
            validator,
            report.succeeded(),
            report.failed()
        );

        Ok(BatchReceipt {
            reward: block.reward,
            block,
            report,
        })
    }

    /// Append a block produced elsewhere. It must have been built on
    /// `expected_tail_hash`; its transactions are executed once it is accepted.
    pub fn import_block(
        &self,
        expected_tail_hash: &str,
        block: Block,
    ) -> Result<ExecutionReport, ChainError> {
        self.inner.producer.registry().ensure_authorized(&block.validator)?;

        let expected_reward = self.inner.producer.rewards().block_reward;
        if block.reward != expected_reward {
            warn!(
                "Block {} from {} claims reward {}, expected {}",
                block.index, block.validator, block.reward, expected_reward
            );
            return Err(ChainError::InvalidBlock(format!(
                "Invalid block reward. Expected {}, but got {}.",
                expected_reward, block.reward
            )));
        }

        let mut chain = self.inner.chain.write();
        let mut ledger = self.inner.ledger.lock();
        let mut tokens = self.inner.tokens.lock();
        tokens.can_credit(&block.validator, block.reward)?;

        chain.compare_and_append(expected_tail_hash, block.clone())?;
        let report = ledger.execute(&block.transactions);
        tokens.credit(&block.validator, block.reward)?;
        Ok(report)
    }

    pub fn tail(&self) -> Block {
        self.inner.chain.read().tail().clone()
    }

    pub fn height(&self) -> u64 {
        self.inner.chain.read().tail().index
    }

    pub fn chain(&self) -> Vec<Block> {
        self.inner.chain.read().snapshot()
    }

    pub fn verify_chain(&self) -> Result<(), ChainError> {
        self.inner.chain.read().verify()
    }

    pub fn balances(&self) -> BTreeMap<String, Amount> {
        self.inner.ledger.lock().snapshot()
    }

    pub fn wallets(&self) -> BTreeMap<String, u64> {
        self.inner.tokens.lock().snapshot()
    }

    pub fn token_balance(&self, owner: &str) -> u64 {
        self.inner.tokens.lock().balance(owner)
    }

    pub fn credit_tokens(&self, owner: &str, amount: u64) -> Result<(), ChainError> {
        self.inner.tokens.lock().credit(owner, amount)
    }

    pub fn try_transfer_tokens(&self, from: &str, to: &str, amount: u64) -> Result<(), ChainError> {
        self.inner.tokens.lock().try_transfer(from, to, amount)
    }

    pub fn transfer_tokens(&self, from: &str, to: &str, amount: u64) -> bool {
        self.inner.tokens.lock().transfer(from, to, amount)
    }
}
