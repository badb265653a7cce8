//! # Escrow Vault
//!
//! One escrow account per complaint. Deposit moves funds from the payer
//! into the vault's custody principal atomically with the record write;
//! release and refund move them out exactly once, gated on the linked
//! complaint's status.
//!
//! ## Invariants
//!
//! - At most one escrow per complaint id; the record is never deleted.
//! - `Released` and `Refunded` are terminal: a settled escrow rejects
//!   further settlement attempts, so outflow for a complaint never
//!   exceeds its deposit.
//! - A failed transfer leaves the escrow map untouched (all-or-nothing).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aegis_claims::{ComplaintLedger, ComplaintStatus};
use aegis_core::{AccountId, Amount, ComplaintId, Timestamp, TransferError, ValueTransfer};

// ─── State ───────────────────────────────────────────────────────────

/// The settlement state of an escrow account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscrowState {
    /// Funds are held in vault custody.
    Deposited,
    /// Funds went to the payee (terminal).
    Released,
    /// Funds went back to the payer (terminal).
    Refunded,
}

impl EscrowState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Refunded)
    }
}

impl std::fmt::Display for EscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Deposited => "deposited",
            Self::Released => "released",
            Self::Refunded => "refunded",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by the escrow vault.
#[derive(Error, Debug)]
pub enum EscrowError {
    /// No escrow for the given complaint.
    #[error("no escrow for {0}")]
    EscrowNotFound(ComplaintId),

    /// The linked complaint has not been resolved.
    #[error("complaint {id} is {status}, not resolved")]
    NotResolved {
        /// The complaint.
        id: ComplaintId,
        /// Its actual status.
        status: ComplaintStatus,
    },

    /// The escrow has already been settled.
    #[error("escrow for {id} already settled ({state})")]
    AlreadySettled {
        /// The complaint.
        id: ComplaintId,
        /// The terminal state it reached.
        state: EscrowState,
    },

    /// The fund transfer failed; nothing was written.
    #[error("escrow transfer failed: {0}")]
    Transfer(#[from] TransferError),

    /// An escrow already exists for the complaint.
    #[error("escrow for {0} already deposited")]
    AlreadyDeposited(ComplaintId),

    /// The caller is not allowed to settle this escrow.
    #[error("caller {caller} may not settle this escrow")]
    NotAuthorized {
        /// The rejected caller.
        caller: AccountId,
    },

    /// No complaint with the given id.
    #[error("complaint not found: {0}")]
    ComplaintNotFound(ComplaintId),

    /// The deposit amount must be positive.
    #[error("invalid escrow amount: must be positive")]
    InvalidAmount,

    /// The complaint is not on the dispute path.
    #[error("complaint {id} is {status}, not escalated — refund requires a dispute")]
    NotDisputed {
        /// The complaint.
        id: ComplaintId,
        /// Its actual status.
        status: ComplaintStatus,
    },
}

impl EscrowError {
    /// Stable numeric wire code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::EscrowNotFound(_) => 600,
            Self::NotResolved { .. } => 601,
            Self::AlreadySettled { .. } => 602,
            Self::Transfer(_) => 603,
            Self::AlreadyDeposited(_) => 604,
            Self::NotAuthorized { .. } => 605,
            Self::ComplaintNotFound(_) => 606,
            Self::NotDisputed { .. } => 607,
            Self::InvalidAmount => 608,
        }
    }
}

// ─── Records ─────────────────────────────────────────────────────────

/// An escrow account held against a complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowAccount {
    /// The complaint the funds are held against.
    pub complaint_id: ComplaintId,
    /// The amount in custody (or settled).
    pub amount: Amount,
    /// Who deposited.
    pub payer: AccountId,
    /// Who receives on release.
    pub payee: AccountId,
    /// Settlement state.
    pub state: EscrowState,
    /// When the deposit happened.
    pub deposited_at: Timestamp,
    /// When the escrow reached a terminal state, if it has.
    pub settled_at: Option<Timestamp>,
}

// ─── Vault ───────────────────────────────────────────────────────────

/// The escrow vault. Holds custody under a dedicated principal.
#[derive(Debug)]
pub struct EscrowVault {
    custody: AccountId,
    escrows: HashMap<u64, EscrowAccount>,
}

impl EscrowVault {
    /// Create a vault with the given custody principal.
    pub fn new(custody: AccountId) -> Self {
        Self {
            custody,
            escrows: HashMap::new(),
        }
    }

    /// The vault's custody principal.
    pub fn custody(&self) -> &AccountId {
        &self.custody
    }

    /// Deposit funds against a complaint.
    ///
    /// Transfers `amount` from the caller into vault custody atomically
    /// with the record write. One escrow per complaint.
    pub fn deposit(
        &mut self,
        bank: &mut dyn ValueTransfer,
        caller: &AccountId,
        complaints: &ComplaintLedger,
        id: ComplaintId,
        amount: Amount,
        payee: AccountId,
    ) -> Result<(), EscrowError> {
        if complaints.get(id).is_none() {
            return Err(EscrowError::ComplaintNotFound(id));
        }
        if self.escrows.contains_key(&id.index()) {
            return Err(EscrowError::AlreadyDeposited(id));
        }
        if amount.is_zero() {
            return Err(EscrowError::InvalidAmount);
        }

        // Last fallible step; a failed transfer writes nothing.
        bank.transfer(amount, caller, &self.custody)?;

        self.escrows.insert(
            id.index(),
            EscrowAccount {
                complaint_id: id,
                amount,
                payer: caller.clone(),
                payee,
                state: EscrowState::Deposited,
                deposited_at: Timestamp::now(),
                settled_at: None,
            },
        );
        tracing::debug!(complaint = %id, payer = %caller, %amount, "escrow deposited");
        Ok(())
    }

    /// Release the escrow to the payee.
    ///
    /// Requires the escrow to be unsettled and the linked complaint to
    /// be resolved. A settled escrow can never transfer again.
    pub fn release(
        &mut self,
        bank: &mut dyn ValueTransfer,
        complaints: &ComplaintLedger,
        id: ComplaintId,
    ) -> Result<(), EscrowError> {
        let escrow = self
            .escrows
            .get(&id.index())
            .ok_or(EscrowError::EscrowNotFound(id))?;
        if escrow.state.is_terminal() {
            return Err(EscrowError::AlreadySettled {
                id,
                state: escrow.state,
            });
        }
        let status = complaints
            .status(id)
            .ok_or(EscrowError::ComplaintNotFound(id))?;
        if status != ComplaintStatus::Resolved {
            return Err(EscrowError::NotResolved { id, status });
        }

        let amount = escrow.amount;
        let payee = escrow.payee.clone();
        // Last fallible step; the state flip below cannot fail.
        bank.transfer(amount, &self.custody, &payee)?;
        self.settle(id, EscrowState::Released);
        tracing::debug!(complaint = %id, %payee, %amount, "escrow released");
        Ok(())
    }

    /// Refund the escrow to the payer (dispute path).
    ///
    /// Only the payer may refund, and only while the linked complaint
    /// is escalated — a pending or resolved complaint cannot drain its
    /// escrow back.
    pub fn refund(
        &mut self,
        bank: &mut dyn ValueTransfer,
        caller: &AccountId,
        complaints: &ComplaintLedger,
        id: ComplaintId,
    ) -> Result<(), EscrowError> {
        let escrow = self
            .escrows
            .get(&id.index())
            .ok_or(EscrowError::EscrowNotFound(id))?;
        if escrow.state.is_terminal() {
            return Err(EscrowError::AlreadySettled {
                id,
                state: escrow.state,
            });
        }
        if caller != &escrow.payer {
            return Err(EscrowError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        let status = complaints
            .status(id)
            .ok_or(EscrowError::ComplaintNotFound(id))?;
        if status != ComplaintStatus::Escalated {
            return Err(EscrowError::NotDisputed { id, status });
        }

        let amount = escrow.amount;
        let payer = escrow.payer.clone();
        bank.transfer(amount, &self.custody, &payer)?;
        self.settle(id, EscrowState::Refunded);
        tracing::debug!(complaint = %id, %payer, %amount, "escrow refunded");
        Ok(())
    }

    /// The escrow record for a complaint, if any.
    pub fn get(&self, id: ComplaintId) -> Option<&EscrowAccount> {
        self.escrows.get(&id.index())
    }

    /// Flip an escrow into a terminal state. Callers have already
    /// validated that the escrow exists and is unsettled.
    fn settle(&mut self, id: ComplaintId, state: EscrowState) {
        if let Some(escrow) = self.escrows.get_mut(&id.index()) {
            escrow.state = state;
            escrow.settled_at = Some(Timestamp::now());
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
