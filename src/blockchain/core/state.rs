use crate::error::ChainError;
use crate::transaction::{Amount, Transaction};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: String,
    pub balance: Amount,
}

/// What happened to one transaction of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub transaction: Transaction,
    pub result: Result<(), ChainError>,
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-transaction results of a batch plus the balances it left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub outcomes: Vec<TransactionOutcome>,
    pub balances: BTreeMap<String, Amount>,
}

impl ExecutionReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Account balances. Mutated only by executing transactions.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    accounts: HashMap<String, Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts<I, S>(accounts: I) -> Self
    where
        I: IntoIterator<Item = (S, Amount)>,
        S: Into<String>,
    {
        let accounts = accounts
            .into_iter()
            .map(|(id, balance)| {
                let id = id.into();
                (id.clone(), Account { id, balance })
            })
            .collect();
        Ledger { accounts }
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn balance(&self, id: &str) -> Option<Amount> {
        self.accounts.get(id).map(|a| a.balance)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all balances, or `None` if it does not fit in an [`Amount`].
    pub fn total_balance(&self) -> Option<Amount> {
        self.accounts
            .values()
            .try_fold(Amount::ZERO, |acc, a| acc.checked_add(a.balance))
    }

    pub fn snapshot(&self) -> BTreeMap<String, Amount> {
        self.accounts
            .values()
            .map(|a| (a.id.clone(), a.balance))
            .collect()
    }

    /// Apply a single transfer. Either both balances move or neither does.
    pub fn apply(&mut self, tx: &Transaction) -> Result<(), ChainError> {
        let amount = tx.amount();
        let from_balance = self
            .balance(tx.from())
            .ok_or_else(|| ChainError::UnknownAccount(tx.from().to_string()))?;
        let to_balance = self
            .balance(tx.to())
            .ok_or_else(|| ChainError::UnknownAccount(tx.to().to_string()))?;

        if from_balance < amount {
            return Err(ChainError::InsufficientBalance {
                account: tx.from().to_string(),
                balance: from_balance.to_string(),
                amount: amount.to_string(),
            });
        }

        if tx.from() == tx.to() {
            return Ok(());
        }

        let new_to_balance = to_balance
            .checked_add(amount)
            .ok_or_else(|| ChainError::AmountOverflow(tx.to().to_string()))?;

        if let Some(from) = self.accounts.get_mut(tx.from()) {
            from.balance = from_balance - amount;
        }
        if let Some(to) = self.accounts.get_mut(tx.to()) {
            to.balance = new_to_balance;
        }
        Ok(())
    }

    /// Run a batch in order. A failed transaction is recorded and skipped;
    /// it never stops the rest of the batch.
    pub fn execute(&mut self, transactions: &[Transaction]) -> ExecutionReport {
        let outcomes = transactions
            .iter()
            .map(|tx| {
                let result = self.apply(tx);
                match &result {
                    Ok(()) => debug!(
                        "Transaction successful: {} -> {} : {}",
                        tx.from(),
                        tx.to(),
                        tx.amount()
                    ),
                    Err(e) => debug!(
                        "Transaction failed: {} -> {} : {} ({})",
                        tx.from(),
                        tx.to(),
                        tx.amount(),
                        e
                    ),
                }
                TransactionOutcome {
                    transaction: tx.clone(),
                    result,
                }
            })
            .collect();

        ExecutionReport {
            outcomes,
            balances: self.snapshot(),
        }
    }
}
