use super::types::{Amount, Transaction};
use crate::error::ChainError;

impl Transaction {
    /// Maximum length of an account identifier
    pub const MAX_ACCOUNT_ID_LENGTH: usize = 128;

    /// Stateless validation: checks account ids and amount bounds.
    /// Does NOT look at balances - the ledger decides that at execution time.
    pub fn validate(&self) -> Result<(), ChainError> {
        validate_account_id("Sender", self.from())?;
        validate_account_id("Recipient", self.to())?;

        if self.amount() < Amount::ZERO {
            return Err(ChainError::InvalidTransaction(format!(
                "Transfer amount cannot be negative (got {})",
                self.amount()
            )));
        }

        Ok(())
    }
}

fn validate_account_id(role: &str, id: &str) -> Result<(), ChainError> {
    if id.trim().is_empty() {
        return Err(ChainError::InvalidTransaction(format!(
            "{} account id cannot be empty",
            role
        )));
    }
    if id.len() > Transaction::MAX_ACCOUNT_ID_LENGTH {
        return Err(ChainError::InvalidTransaction(format!(
            "{} account id exceeds maximum length of {} characters",
            role,
            Transaction::MAX_ACCOUNT_ID_LENGTH
        )));
    }
    Ok(())
}
