//! # Intervention Ledger
//!
//! Dispatches and completes in-person service for escalated complaints.
//!
//! ## States
//!
//! ```text
//! escalated ──▶ dispatched ──▶ completed
//! ```
//!
//! Dispatch requires the complaint to be escalated; completion drives
//! the complaint to `resolved`. One intervention per complaint id —
//! re-dispatch overwrites.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aegis_core::{AccountId, ComplaintId, Timestamp};

use crate::complaint::{ComplaintLedger, ComplaintStatus};

// ─── Status ──────────────────────────────────────────────────────────

/// The status of an intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterventionStatus {
    /// A technician has been dispatched.
    Dispatched,
    /// On-site service is complete (terminal).
    Completed,
}

impl std::fmt::Display for InterventionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Dispatched => "dispatched",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by the intervention ledger.
#[derive(Error, Debug)]
pub enum InterventionError {
    /// The complaint is not in the escalated state.
    #[error("complaint {id} is {status}, not escalated")]
    NotEscalated {
        /// The complaint.
        id: ComplaintId,
        /// Its actual status.
        status: ComplaintStatus,
    },

    /// No intervention recorded for the complaint.
    #[error("no intervention for {0}")]
    InterventionNotFound(ComplaintId),

    /// No complaint with the given id.
    #[error("complaint not found: {0}")]
    ComplaintNotFound(ComplaintId),
}

impl InterventionError {
    /// Stable numeric wire code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::NotEscalated { .. } => 500,
            Self::InterventionNotFound(_) => 501,
            Self::ComplaintNotFound(_) => 502,
        }
    }
}

// ─── Records ─────────────────────────────────────────────────────────

/// An in-person service action for an escalated complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    /// The complaint being serviced.
    pub complaint_id: ComplaintId,
    /// The dispatched provider.
    pub provider: AccountId,
    /// Current status.
    pub status: InterventionStatus,
    /// When the intervention was dispatched.
    pub dispatched_at: Timestamp,
    /// When on-site service completed, if it has.
    pub completion_time: Option<Timestamp>,
}

// ─── Ledger ──────────────────────────────────────────────────────────

/// The intervention ledger.
#[derive(Debug, Default)]
pub struct InterventionLedger {
    interventions: HashMap<u64, Intervention>,
}

impl InterventionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a provider for an escalated complaint.
    ///
    /// Re-dispatch overwrites the existing record.
    pub fn dispatch(
        &mut self,
        complaints: &ComplaintLedger,
        id: ComplaintId,
        provider: AccountId,
    ) -> Result<(), InterventionError> {
        let status = complaints
            .status(id)
            .ok_or(InterventionError::ComplaintNotFound(id))?;
        if status != ComplaintStatus::Escalated {
            return Err(InterventionError::NotEscalated { id, status });
        }
        self.interventions.insert(
            id.index(),
            Intervention {
                complaint_id: id,
                provider: provider.clone(),
                status: InterventionStatus::Dispatched,
                dispatched_at: Timestamp::now(),
                completion_time: None,
            },
        );
        tracing::debug!(complaint = %id, provider = %provider, "intervention dispatched");
        Ok(())
    }

    /// Complete a dispatched intervention and resolve the complaint.
    pub fn complete(
        &mut self,
        complaints: &mut ComplaintLedger,
        id: ComplaintId,
    ) -> Result<(), InterventionError> {
        if !self.interventions.contains_key(&id.index()) {
            return Err(InterventionError::InterventionNotFound(id));
        }
        // Last fallible step; the record write below cannot fail.
        complaints
            .set_status(id, ComplaintStatus::Resolved)
            .map_err(|_| InterventionError::ComplaintNotFound(id))?;
        if let Some(intervention) = self.interventions.get_mut(&id.index()) {
            intervention.status = InterventionStatus::Completed;
            intervention.completion_time = Some(Timestamp::now());
        }
        tracing::debug!(complaint = %id, "intervention completed");
        Ok(())
    }

    /// The intervention record for a complaint, if any.
    pub fn get(&self, id: ComplaintId) -> Option<&Intervention> {
        self.interventions.get(&id.index())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::MonitoringAdapter;
    use crate::test_support::contracts_with_one_contract;
    use aegis_oracle::FixedOracle;

    fn acct(s: &str) -> AccountId {
        AccountId::new(s)
    }

    fn escalated_complaint() -> (ComplaintLedger, ComplaintId) {
        let (contracts, contract_id) = contracts_with_one_contract();
        let mut complaints = ComplaintLedger::new();
        let id = complaints
            .file(&contracts, contract_id, "keyboard dead")
            .unwrap();
        let mut adapter = MonitoringAdapter::new();
        adapter
            .trigger(&mut complaints, id, &FixedOracle::escalating())
            .unwrap();
        (complaints, id)
    }

    #[test]
    fn test_dispatch_requires_escalated() {
        let (contracts, contract_id) = contracts_with_one_contract();
        let mut complaints = ComplaintLedger::new();
        let id = complaints
            .file(&contracts, contract_id, "keyboard dead")
            .unwrap();

        let mut ledger = InterventionLedger::new();
        let err = ledger
            .dispatch(&complaints, id, acct("P1"))
            .unwrap_err();
        assert!(matches!(
            err,
            InterventionError::NotEscalated {
                status: ComplaintStatus::Pending,
                ..
            }
        ));
        assert_eq!(err.code(), 500);
    }

    #[test]
    fn test_dispatch_escalated_complaint() {
        let (complaints, id) = escalated_complaint();
        let mut ledger = InterventionLedger::new();
        ledger.dispatch(&complaints, id, acct("P1")).unwrap();

        let record = ledger.get(id).unwrap();
        assert_eq!(record.status, InterventionStatus::Dispatched);
        assert_eq!(record.provider, acct("P1"));
        assert!(record.completion_time.is_none());
    }

    #[test]
    fn test_dispatch_unknown_complaint() {
        let complaints = ComplaintLedger::new();
        let mut ledger = InterventionLedger::new();
        let err = ledger
            .dispatch(&complaints, ComplaintId(3), acct("P1"))
            .unwrap_err();
        assert!(matches!(err, InterventionError::ComplaintNotFound(_)));
        assert_eq!(err.code(), 502);
    }

    #[test]
    fn test_redispatch_overwrites() {
        let (complaints, id) = escalated_complaint();
        let mut ledger = InterventionLedger::new();
        ledger.dispatch(&complaints, id, acct("P1")).unwrap();
        ledger.dispatch(&complaints, id, acct("P2")).unwrap();
        assert_eq!(ledger.get(id).unwrap().provider, acct("P2"));
    }

    #[test]
    fn test_complete_resolves_complaint() {
        let (mut complaints, id) = escalated_complaint();
        let mut ledger = InterventionLedger::new();
        ledger.dispatch(&complaints, id, acct("P1")).unwrap();
        ledger.complete(&mut complaints, id).unwrap();

        let record = ledger.get(id).unwrap();
        assert_eq!(record.status, InterventionStatus::Completed);
        assert!(record.completion_time.is_some());
        assert_eq!(complaints.status(id), Some(ComplaintStatus::Resolved));
    }

    #[test]
    fn test_complete_without_dispatch() {
        let (mut complaints, id) = escalated_complaint();
        let mut ledger = InterventionLedger::new();
        let err = ledger.complete(&mut complaints, id).unwrap_err();
        assert!(matches!(err, InterventionError::InterventionNotFound(_)));
        assert_eq!(err.code(), 501);
        // Complaint untouched.
        assert_eq!(complaints.status(id), Some(ComplaintStatus::Escalated));
    }

    #[test]
    fn test_intervention_serialization() {
        let (complaints, id) = escalated_complaint();
        let mut ledger = InterventionLedger::new();
        ledger.dispatch(&complaints, id, acct("P1")).unwrap();
        let record = ledger.get(id).unwrap();
        let json = serde_json::to_string(record).unwrap();
        let parsed: Intervention = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, record.status);
        assert_eq!(parsed.provider, record.provider);
    }
}
