//! # aegis-claims — Complaint Lifecycle
//!
//! The complaint-side components of the Aegis Warranty Stack:
//!
//! - **ComplaintLedger** (`complaint.rs`): files complaints against
//!   existing service contracts and owns complaint status.
//!
//! - **MonitoringAdapter** (`monitor.rs`): invokes a remote diagnostic
//!   provider and either resolves or escalates the complaint.
//!
//! - **InterventionLedger** (`intervention.rs`): dispatches and
//!   completes in-person service for escalated complaints.
//!
//! ## States
//!
//! ```text
//! pending ──▶ resolved            (monitoring: outcome "resolved")
//!    │
//!    └─────▶ escalated ──▶ resolved   (intervention completed)
//! ```
//!
//! ## Capability Boundary
//!
//! Complaint status transitions are system-driven: the filer cannot
//! mutate status after creation. `ComplaintLedger::set_status` is
//! `pub(crate)`, so only the monitoring adapter and the intervention
//! ledger — which live in this crate — can drive transitions. External
//! callers simply cannot name the operation.

pub mod complaint;
pub mod intervention;
pub mod monitor;

#[cfg(test)]
pub(crate) mod test_support;

// ─── Complaint re-exports ───────────────────────────────────────────

pub use complaint::{Complaint, ComplaintError, ComplaintLedger, ComplaintStatus};

// ─── Monitoring re-exports ──────────────────────────────────────────

pub use monitor::{MonitorError, MonitoringAdapter, MonitoringOutcome, MonitoringResult};

// ─── Intervention re-exports ────────────────────────────────────────

pub use intervention::{
    Intervention, InterventionError, InterventionLedger, InterventionStatus,
};
