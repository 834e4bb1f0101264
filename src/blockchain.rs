// Thin re-export module: implementation is in `blockchain/core.rs`, split into
// hash-chain validation, chain management and account state.

pub mod core;
pub use core::*;
