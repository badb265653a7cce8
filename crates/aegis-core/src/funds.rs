//! # Value Transfer Capability
//!
//! Defines the abstract interface for moving funds between principals.
//! Ledgers never mutate balances directly — every fund movement flows
//! through [`ValueTransfer`], so the in-memory settlement backend and an
//! external one are interchangeable at compile time.
//!
//! ## Atomicity Contract
//!
//! A transfer either moves the full amount or moves nothing. Callers
//! sequence all validation before the transfer and all record writes
//! after it, so a failed transfer leaves the calling ledger untouched
//! and a successful transfer is always followed by the matching record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::AccountId;

/// A quantity of settlement units.
///
/// Amounts are unsigned and checked: the settlement backend rejects
/// overdrafts and balance overflow rather than wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Amount(pub u64);

impl Amount {
    /// Zero units.
    pub const ZERO: Amount = Amount(0);

    /// The raw unit count.
    pub fn units(&self) -> u64 {
        self.0
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error during a value transfer.
#[derive(Error, Debug)]
pub enum TransferError {
    /// The source account cannot cover the transfer.
    #[error("insufficient funds in {account}: need {required}, have {available}")]
    InsufficientFunds {
        /// The source account.
        account: String,
        /// The amount requested.
        required: Amount,
        /// The balance actually held.
        available: Amount,
    },

    /// Crediting the destination would overflow its balance.
    #[error("balance overflow crediting {account}")]
    BalanceOverflow {
        /// The destination account.
        account: String,
    },

    /// The settlement backend rejected the transfer.
    #[error("settlement backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// Abstract interface for moving funds between principals.
///
/// Implementations must be all-or-nothing: on error, no balance has
/// changed.
pub trait ValueTransfer: Send + Sync {
    /// Move `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        amount: Amount,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<(), TransferError>;

    /// The current balance of an account, if the backend tracks one.
    fn balance_of(&self, account: &AccountId) -> Amount;
}

/// In-memory settlement backend.
///
/// Phase 1 backend and test double: a plain balance map with checked
/// debits and credits. `mint` seeds balances out of thin air.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    balances: HashMap<AccountId, u64>,
}

impl InMemoryBank {
    /// Create an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air.
    pub fn mint(&mut self, account: &AccountId, amount: Amount) {
        *self.balances.entry(account.clone()).or_insert(0) += amount.units();
    }
}

impl ValueTransfer for InMemoryBank {
    fn transfer(
        &mut self,
        amount: Amount,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<(), TransferError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                account: from.to_string(),
                required: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .units()
            .checked_add(amount.units())
            .ok_or_else(|| TransferError::BalanceOverflow {
                account: to.to_string(),
            })?;
        // Both sides checked; the two writes below cannot fail.
        *self.balances.entry(from.clone()).or_insert(0) -= amount.units();
        self.balances.insert(to.clone(), credited);
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        Amount(self.balances.get(account).copied().unwrap_or(0))
    }
}
