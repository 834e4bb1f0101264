// core.rs splits responsibilities into submodules: the hash chain rules,
// the block sequence, and the account ledger.
pub mod chain;
pub mod state;
pub mod validation;

pub use chain::*;
pub use state::*;
pub use validation::*;
