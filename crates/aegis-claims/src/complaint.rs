//! # Complaint Ledger
//!
//! Files complaints against existing service contracts and owns
//! complaint status. Ids are monotonic from 0 with no gaps or reuse;
//! records are never deleted, only status-flagged.
//!
//! Status transitions are system-driven: [`ComplaintLedger::set_status`]
//! is `pub(crate)` and reachable only from the monitoring adapter and
//! the intervention ledger in this crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aegis_contracts::ContractLedger;
use aegis_core::{ComplaintId, ContractId, Timestamp};

/// Maximum complaint description length.
pub const MAX_DESCRIPTION_LEN: usize = 256;

// ─── Status ──────────────────────────────────────────────────────────

/// The lifecycle status of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    /// Filed, awaiting monitoring.
    Pending,
    /// Closed by monitoring or intervention (terminal).
    Resolved,
    /// Monitoring could not resolve; awaiting intervention.
    Escalated,
}

impl ComplaintStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Escalated => "escalated",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by the complaint ledger.
#[derive(Error, Debug)]
pub enum ComplaintError {
    /// The referenced service contract does not exist.
    #[error("contract not found: {0}")]
    ContractNotFound(ContractId),

    /// No complaint with the given id.
    #[error("complaint not found: {0}")]
    ComplaintNotFound(ComplaintId),

    /// The description is empty or too long.
    #[error("invalid description: length {len} not in 1..={MAX_DESCRIPTION_LEN}")]
    InvalidDescription {
        /// Observed length.
        len: usize,
    },
}

impl ComplaintError {
    /// Stable numeric wire code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::ContractNotFound(_) => 300,
            Self::ComplaintNotFound(_) => 301,
            Self::InvalidDescription { .. } => 302,
        }
    }
}

// ─── Records ─────────────────────────────────────────────────────────

/// A filed complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    /// Ledger-assigned identifier.
    pub id: ComplaintId,
    /// The service contract the complaint is filed against.
    pub contract_id: ContractId,
    /// Free-text problem description (1–256 chars).
    pub description: String,
    /// Current lifecycle status.
    pub status: ComplaintStatus,
    /// When the complaint was filed.
    pub timestamp: Timestamp,
}

// ─── Ledger ──────────────────────────────────────────────────────────

/// The complaint ledger.
#[derive(Debug, Default)]
pub struct ComplaintLedger {
    complaints: BTreeMap<u64, Complaint>,
    next_id: u64,
}

impl ComplaintLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// File a complaint against an existing service contract.
    pub fn file(
        &mut self,
        contracts: &ContractLedger,
        contract_id: ContractId,
        description: impl Into<String>,
    ) -> Result<ComplaintId, ComplaintError> {
        if !contracts.exists(contract_id) {
            return Err(ComplaintError::ContractNotFound(contract_id));
        }
        let description = description.into();
        let len = description.chars().count();
        if len == 0 || len > MAX_DESCRIPTION_LEN {
            return Err(ComplaintError::InvalidDescription { len });
        }

        let id = ComplaintId(self.next_id);
        self.complaints.insert(
            id.index(),
            Complaint {
                id,
                contract_id,
                description,
                status: ComplaintStatus::Pending,
                timestamp: Timestamp::now(),
            },
        );
        self.next_id += 1;
        tracing::debug!(complaint = %id, contract = %contract_id, "complaint filed");
        Ok(id)
    }

    /// Look up a complaint record.
    pub fn get(&self, id: ComplaintId) -> Option<&Complaint> {
        self.complaints.get(&id.index())
    }

    /// The status of a complaint, if it exists.
    pub fn status(&self, id: ComplaintId) -> Option<ComplaintStatus> {
        self.complaints.get(&id.index()).map(|c| c.status)
    }

    /// Number of complaints ever filed.
    pub fn count(&self) -> u64 {
        self.complaints.len() as u64
    }

    /// Overwrite a complaint's status.
    ///
    /// Crate-internal: only the monitoring adapter and the intervention
    /// ledger may drive status transitions.
    pub(crate) fn set_status(
        &mut self,
        id: ComplaintId,
        status: ComplaintStatus,
    ) -> Result<(), ComplaintError> {
        let complaint = self
            .complaints
            .get_mut(&id.index())
            .ok_or(ComplaintError::ComplaintNotFound(id))?;
        tracing::debug!(complaint = %id, from = %complaint.status, to = %status, "complaint status transition");
        complaint.status = status;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
