//! # Mock Diagnostic Providers
//!
//! Deterministic providers for tests and Phase 1 deployments. A
//! [`FixedOracle`] always returns the same outcome code; an
//! [`UnavailableOracle`] always fails. Both satisfy the trait interface,
//! so production wiring and test wiring differ only in the provider
//! value passed to the adapter.

use aegis_core::ComplaintId;

use crate::traits::{DiagnosticError, DiagnosticProvider, RESOLVED_OUTCOME};

/// A provider that returns a fixed outcome code for every complaint.
#[derive(Debug, Clone)]
pub struct FixedOracle {
    outcome: String,
}

impl FixedOracle {
    /// A provider returning the given outcome code.
    pub fn new(outcome: impl Into<String>) -> Self {
        Self {
            outcome: outcome.into(),
        }
    }

    /// A provider that resolves every complaint.
    pub fn resolving() -> Self {
        Self::new(RESOLVED_OUTCOME)
    }

    /// A provider that escalates every complaint.
    pub fn escalating() -> Self {
        Self::new("hardware-fault")
    }
}

impl DiagnosticProvider for FixedOracle {
    fn diagnose(&self, _complaint: ComplaintId) -> Result<String, DiagnosticError> {
        Ok(self.outcome.clone())
    }
}

/// A provider that is never reachable.
#[derive(Debug, Clone, Default)]
pub struct UnavailableOracle;

impl DiagnosticProvider for UnavailableOracle {
    fn diagnose(&self, complaint: ComplaintId) -> Result<String, DiagnosticError> {
        Err(DiagnosticError::Unavailable(format!(
            "no diagnostic route for {complaint}"
        )))
    }
}
