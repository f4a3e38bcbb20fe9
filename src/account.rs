use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::statement::Statement;
use crate::transaction::Transaction;

/// Every transaction imported during a run, in the order they were read.
#[derive(Clone, Default, Debug)]
pub struct Account {
    name: Option<String>,
    transactions: Vec<Transaction>,
}

impl Account {
    /// An account whose name is known up front.
    pub fn named(name: &str) -> Account {
        Account {
            name: Some(name.to_string()),
            transactions: Vec::new(),
        }
    }

    /// An account named by the first statement recorded into it.
    pub fn detected() -> Account {
        Account::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Appends a statement's transactions. All statements must belong to
    /// the same account.
    pub fn record(&mut self, statement: Statement) -> Result<()> {
        let name = self
            .name
            .get_or_insert_with(|| statement.account.clone());
        if *name != statement.account {
            return Err(Error::AccountMismatch {
                expected: name.clone(),
                found: statement.account,
            });
        }
        self.transactions.extend(statement.transactions);
        Ok(())
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn total_debits(&self) -> Decimal {
        self.transactions
            .iter()
            .fold(Decimal::new(0, 2), |sum, t| sum + t.debit_value())
    }

    pub fn total_credits(&self) -> Decimal {
        self.transactions
            .iter()
            .fold(Decimal::new(0, 2), |sum, t| sum + t.credit_value())
    }

    pub fn total_balance(&self) -> Decimal {
        self.transactions
            .iter()
            .fold(Decimal::new(0, 2), |sum, t| sum + t.balance())
    }

    // Validates that the per-line balances add up to credits minus debits
    pub fn validate(&self) -> bool {
        self.total_balance() == self.total_credits() - self.total_debits()
    }
}
