//! LedgerChain - a permissioned hash-chained ledger
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Blockchain
//! - [`blockchain`] - Hash chain rules, the block sequence and account balances
//! - [`transaction`] - Value transfers between accounts
//!
//! ## Block Production
//! - [`consensus`] - Validator whitelist
//! - [`producer`] - Candidate block construction
//! - [`economics`] - Block rewards and the token ledger
//!
//! ## Orchestration
//! - [`node`] - Thread-safe batch pipeline over all of the above
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Blockchain
// ============================================================================
pub mod blockchain;
pub mod transaction;

// ============================================================================
// Block Production
// ============================================================================
pub mod consensus;
pub mod economics;
pub mod producer;

// ============================================================================
// Orchestration
// ============================================================================
pub mod node;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
