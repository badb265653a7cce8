//! # Monitoring Adapter
//!
//! Invokes a remote diagnostic provider for a pending complaint and
//! records the result. A `resolved` outcome closes the complaint; any
//! other outcome escalates it so the intervention ledger's precondition
//! can be satisfied. A provider failure aborts the whole call with no
//! state change.
//!
//! One current result per complaint; a re-trigger overwrites it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aegis_core::{ComplaintId, Timestamp};
use aegis_oracle::{DiagnosticError, DiagnosticProvider, RESOLVED_OUTCOME};

use crate::complaint::{ComplaintLedger, ComplaintStatus};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by the monitoring adapter.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// The diagnostic provider call failed; no state changed.
    #[error("diagnostic provider unavailable: {0}")]
    OracleUnavailable(#[from] DiagnosticError),

    /// No complaint with the given id.
    #[error("complaint not found: {0}")]
    ComplaintNotFound(ComplaintId),
}

impl MonitorError {
    /// Stable numeric wire code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::OracleUnavailable(_) => 400,
            Self::ComplaintNotFound(_) => 401,
        }
    }
}

// ─── Records ─────────────────────────────────────────────────────────

/// The recorded outcome of the latest diagnostic run for a complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringResult {
    /// The diagnosed complaint.
    pub complaint_id: ComplaintId,
    /// Free-text outcome code returned by the provider.
    pub outcome: String,
    /// Whether the outcome resolved the complaint.
    pub resolved: bool,
    /// When the diagnosis ran.
    pub timestamp: Timestamp,
}

/// Which branch a trigger took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitoringOutcome {
    /// The complaint was resolved remotely.
    Resolved,
    /// The complaint was escalated for in-person service.
    Escalated,
}

// ─── Adapter ─────────────────────────────────────────────────────────

/// The monitoring adapter. Owns the per-complaint result records.
#[derive(Debug, Default)]
pub struct MonitoringAdapter {
    results: HashMap<u64, MonitoringResult>,
}

impl MonitoringAdapter {
    /// Create an adapter with no recorded results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run remote diagnosis for a complaint.
    ///
    /// Calls the provider synchronously within this operation. On
    /// provider failure the call fails with no state change. On success
    /// the result is recorded (overwriting any prior record) and the
    /// complaint transitions to `resolved` or `escalated`.
    pub fn trigger(
        &mut self,
        complaints: &mut ComplaintLedger,
        id: ComplaintId,
        oracle: &dyn DiagnosticProvider,
    ) -> Result<MonitoringOutcome, MonitorError> {
        if complaints.get(id).is_none() {
            return Err(MonitorError::ComplaintNotFound(id));
        }

        // Last fallible step before any write.
        let outcome = oracle.diagnose(id).map_err(|e| {
            tracing::warn!(complaint = %id, error = %e, "diagnostic provider failed");
            e
        })?;

        let resolved = outcome == RESOLVED_OUTCOME;
        self.results.insert(
            id.index(),
            MonitoringResult {
                complaint_id: id,
                outcome,
                resolved,
                timestamp: Timestamp::now(),
            },
        );
        let (status, branch) = if resolved {
            (ComplaintStatus::Resolved, MonitoringOutcome::Resolved)
        } else {
            (ComplaintStatus::Escalated, MonitoringOutcome::Escalated)
        };
        // Existence was checked above; the transition cannot fail.
        complaints
            .set_status(id, status)
            .map_err(|_| MonitorError::ComplaintNotFound(id))?;
        tracing::debug!(complaint = %id, %status, "monitoring outcome recorded");
        Ok(branch)
    }

    /// The latest diagnostic result for a complaint, if any.
    pub fn result(&self, id: ComplaintId) -> Option<&MonitoringResult> {
        self.results.get(&id.index())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
