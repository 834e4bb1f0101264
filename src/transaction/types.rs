/// Transaction types for LedgerChain
use crate::error::ChainError;
use fixed::types::I32F32;
use serde::Serialize;

/// Deterministic fixed-point decimal used for balances and transfer amounts.
pub type Amount = I32F32;

/// A value transfer between two ledger accounts.
///
/// Fields are private: a transaction is validated once in [`Transaction::new`]
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Transaction {
    from: String,
    to: String,
    amount: Amount,
}

impl Transaction {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Amount,
    ) -> Result<Self, ChainError> {
        let tx = Transaction {
            from: from.into(),
            to: to.into(),
            amount,
        };
        tx.validate()?;
        Ok(tx)
    }

    /// Build a transaction from a floating-point amount, as read from config or a CLI.
    pub fn from_num(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: f64,
    ) -> Result<Self, ChainError> {
        let amount = Amount::checked_from_num(amount).ok_or_else(|| {
            ChainError::InvalidTransaction(format!("Amount {} is not representable", amount))
        })?;
        Self::new(from, to, amount)
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Canonical byte form, used when a block hash covers its transactions.
    /// Every field is length-prefixed; the amount is its raw fixed-point bits.
    pub fn hash_material(&self) -> Vec<u8> {
        let amount = self.amount.to_bits().to_le_bytes();
        let fields: [&[u8]; 3] = [self.from.as_bytes(), self.to.as_bytes(), &amount];

        let mut material = Vec::with_capacity(fields.iter().map(|f| f.len() + 8).sum());
        for field in fields {
            material.extend_from_slice(&(field.len() as u64).to_le_bytes());
            material.extend_from_slice(field);
        }
        material
    }
}
