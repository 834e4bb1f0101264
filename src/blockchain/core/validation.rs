use super::chain::Block;
use crate::error::ChainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Which block fields feed the content hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashScope {
    /// index, timestamp, payload label and previous hash
    #[default]
    Header,
    /// header fields followed by the transactions, the validator and the reward
    Full,
}

/// Content hashing and linkage rules for consecutive blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HashChain {
    scope: HashScope,
}

impl HashChain {
    pub fn new(scope: HashScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> HashScope {
        self.scope
    }

    /// SHA-256 of the hashed fields, as lowercase hex.
    ///
    /// `Header` hashes the plain text concatenation of the header fields.
    /// `Full` length-prefixes every field, so distinct blocks never share an encoding.
    pub fn compute(&self, block: &Block) -> String {
        let mut hasher = Sha256::new();

        match self.scope {
            HashScope::Header => {
                hasher.update(block.index.to_string().as_bytes());
                hasher.update(block.timestamp.as_bytes());
                hasher.update(block.payload.as_bytes());
                hasher.update(block.previous_hash.as_bytes());
            }
            HashScope::Full => {
                hasher.update(block.index.to_le_bytes());
                update_prefixed(&mut hasher, block.timestamp.as_bytes());
                update_prefixed(&mut hasher, block.payload.as_bytes());
                update_prefixed(&mut hasher, block.previous_hash.as_bytes());
                hasher.update((block.transactions.len() as u64).to_le_bytes());
                for tx in &block.transactions {
                    update_prefixed(&mut hasher, &tx.hash_material());
                }
                update_prefixed(&mut hasher, block.validator.as_bytes());
                hasher.update(block.reward.to_le_bytes());
            }
        }

        hex::encode(hasher.finalize())
    }

    /// Check `candidate` against the block it claims to follow.
    pub fn validate(&self, candidate: &Block, predecessor: &Block) -> Result<(), ChainError> {
        let expected_index = predecessor.index.checked_add(1).ok_or_else(|| {
            ChainError::InvalidBlock("Predecessor index is at its maximum.".to_string())
        })?;

        if candidate.index != expected_index {
            return Err(ChainError::InvalidBlock(format!(
                "Invalid block index. Expected {}, but got {}.",
                expected_index, candidate.index
            )));
        }

        if candidate.previous_hash != predecessor.hash {
            return Err(ChainError::InvalidBlock(format!(
                "Invalid previous block hash. Expected {}, but got {}.",
                predecessor.hash, candidate.previous_hash
            )));
        }

        self.validate_integrity(candidate)
    }

    pub fn is_valid(&self, candidate: &Block, predecessor: &Block) -> bool {
        self.validate(candidate, predecessor).is_ok()
    }

    /// Genesis blocks have no predecessor; only their shape and own hash are checked.
    pub fn validate_genesis(&self, genesis: &Block) -> Result<(), ChainError> {
        if genesis.index != 0 || !genesis.previous_hash.is_empty() {
            return Err(ChainError::InvalidBlock(
                "Genesis block must have index 0 and an empty previous hash.".to_string(),
            ));
        }
        self.validate_integrity(genesis)
    }

    fn validate_integrity(&self, block: &Block) -> Result<(), ChainError> {
        let expected_hash = self.compute(block);
        if expected_hash != block.hash {
            return Err(ChainError::InvalidBlock(format!(
                "Block hash mismatch. Expected {}, but got {}.",
                expected_hash, block.hash
            )));
        }
        Ok(())
    }
}

fn update_prefixed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;

    fn genesis(hash_chain: &HashChain) -> Block {
        Block::genesis("Genesis Block", "2024-01-01T00:00:00Z", hash_chain)
    }

    fn successor(previous: &Block, hash_chain: &HashChain) -> Block {
        let mut block = Block {
            index: previous.index + 1,
            timestamp: "2024-01-01T00:00:01Z".to_string(),
            payload: String::new(),
            hash: String::new(),
            previous_hash: previous.hash.clone(),
            transactions: vec![Transaction::from_num("Alice", "Bob", 10.0).unwrap()],
            validator: "validator1".to_string(),
            reward: 1,
        };
        block.hash = hash_chain.compute(&block);
        block
    }

    #[test]
    fn test_compute_is_deterministic() {
        let hash_chain = HashChain::default();
        let block = genesis(&hash_chain);
        assert_eq!(hash_chain.compute(&block), hash_chain.compute(&block));
    }

    #[test]
    fn test_compute_matches_text_concatenation() {
        let hash_chain = HashChain::default();
        let block = genesis(&hash_chain);

        let mut hasher = Sha256::new();
        hasher.update("02024-01-01T00:00:00ZGenesis Block".as_bytes());
        let expected = hex::encode(hasher.finalize());

        assert_eq!(block.hash, expected);
        assert_eq!(block.hash.len(), 64);
        assert!(block.hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_valid_successor() {
        let hash_chain = HashChain::default();
        let first = genesis(&hash_chain);
        let second = successor(&first, &hash_chain);
        assert!(hash_chain.is_valid(&second, &first));
    }

    #[test]
    fn test_index_mismatch_rejected() {
        let hash_chain = HashChain::default();
        let first = genesis(&hash_chain);
        let mut second = successor(&first, &hash_chain);
        second.index = 5;
        second.hash = hash_chain.compute(&second);

        match hash_chain.validate(&second, &first) {
            Err(ChainError::InvalidBlock(msg)) => assert!(msg.contains("index")),
            other => panic!("Expected InvalidBlock error, got {:?}", other),
        }
    }

    #[test]
    fn test_linkage_mismatch_rejected() {
        let hash_chain = HashChain::default();
        let first = genesis(&hash_chain);
        let mut second = successor(&first, &hash_chain);
        second.previous_hash = "00".repeat(32);
        second.hash = hash_chain.compute(&second);

        match hash_chain.validate(&second, &first) {
            Err(ChainError::InvalidBlock(msg)) => assert!(msg.contains("previous block hash")),
            other => panic!("Expected InvalidBlock error, got {:?}", other),
        }
    }

    #[test]
    fn test_tampered_header_field_detected() {
        let hash_chain = HashChain::default();
        let first = genesis(&hash_chain);
        let mut second = successor(&first, &hash_chain);
        second.timestamp = "2030-01-01T00:00:00Z".to_string();

        assert_ne!(hash_chain.compute(&second), second.hash);
        assert!(!hash_chain.is_valid(&second, &first));
    }

    #[test]
    fn test_header_scope_ignores_transactions_and_validator() {
        let hash_chain = HashChain::new(HashScope::Header);
        let first = genesis(&hash_chain);
        let mut second = successor(&first, &hash_chain);
        second.transactions.clear();
        second.validator = "mallory".to_string();

        assert!(hash_chain.is_valid(&second, &first));
    }

    #[test]
    fn test_full_scope_covers_transactions_and_validator() {
        let hash_chain = HashChain::new(HashScope::Full);
        let first = genesis(&hash_chain);
        let second = successor(&first, &hash_chain);
        assert!(hash_chain.is_valid(&second, &first));

        let mut tampered = second.clone();
        tampered.transactions.clear();
        assert!(!hash_chain.is_valid(&tampered, &first));

        let mut tampered = second;
        tampered.validator = "mallory".to_string();
        assert!(!hash_chain.is_valid(&tampered, &first));
    }

    #[test]
    fn test_scopes_disagree_on_non_genesis_hash() {
        let header = HashChain::new(HashScope::Header);
        let full = HashChain::new(HashScope::Full);
        let first = genesis(&header);
        let second = successor(&first, &header);
        assert_ne!(header.compute(&second), full.compute(&second));
    }

    #[test]
    fn test_full_scope_validator_reward_boundary() {
        let hash_chain = HashChain::new(HashScope::Full);
        let first = genesis(&hash_chain);
        let second = successor(&first, &hash_chain);

        let mut shifted = second.clone();
        shifted.validator = "validator".to_string();
        shifted.reward = 11;

        assert_ne!(hash_chain.compute(&shifted), second.hash);
        assert!(!hash_chain.is_valid(&shifted, &first));
    }

    #[test]
    fn test_full_scope_transaction_boundaries() {
        let hash_chain = HashChain::new(HashScope::Full);
        let first = genesis(&hash_chain);
        let mut second = successor(&first, &hash_chain);
        second.transactions = vec![
            Transaction::from_num("A", "B", 1.0).unwrap(),
            Transaction::from_num("C", "D", 2.0).unwrap(),
        ];
        second.hash = hash_chain.compute(&second);

        let mut merged = second.clone();
        merged.transactions = vec![Transaction::from_num("A", "B:1C->D", 2.0).unwrap()];
        assert_ne!(hash_chain.compute(&merged), second.hash);
        assert!(!hash_chain.is_valid(&merged, &first));
    }

    #[test]
    fn test_full_scope_header_field_boundaries() {
        let hash_chain = HashChain::new(HashScope::Full);
        let first = genesis(&hash_chain);
        let mut second = successor(&first, &hash_chain);
        second.payload = "x".to_string();
        second.hash = hash_chain.compute(&second);

        let mut shifted = second.clone();
        shifted.timestamp.pop();
        shifted.payload = "Zx".to_string();
        assert!(!hash_chain.is_valid(&shifted, &first));
    }

    #[test]
    fn test_validate_genesis() {
        let hash_chain = HashChain::default();
        let mut block = genesis(&hash_chain);
        assert!(hash_chain.validate_genesis(&block).is_ok());

        block.previous_hash = "abc".to_string();
        assert!(hash_chain.validate_genesis(&block).is_err());
    }
}
