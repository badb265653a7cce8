//! # Diagnostic Provider Trait
//!
//! Defines the abstract interface for remote laptop diagnosis. All
//! implementations (mock, vendor telemetry bridges) must satisfy this
//! trait.
//!
//! ## Invariant
//!
//! Diagnosis is synchronous and side-effect free from the caller's
//! perspective: a provider either returns an outcome code or fails, and
//! a failure must leave the calling operation's state untouched. The
//! trait requires `Send + Sync` bounds for safe shared access.

use thiserror::Error;

use aegis_core::ComplaintId;

/// The outcome code that marks a complaint as resolved by remote
/// diagnosis. Any other outcome escalates the complaint.
pub const RESOLVED_OUTCOME: &str = "resolved";

/// Error during a diagnostic call.
#[derive(Error, Debug)]
pub enum DiagnosticError {
    /// The provider could not be reached or returned no data.
    #[error("diagnostic provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered but the response was malformed.
    #[error("malformed diagnostic response: {0}")]
    MalformedResponse(String),
}

/// Abstract interface for a remote diagnostic provider.
///
/// The adapter treats the returned outcome as an opaque code; only
/// [`RESOLVED_OUTCOME`] has defined meaning.
pub trait DiagnosticProvider: Send + Sync {
    /// Run remote diagnosis for the given complaint and return the
    /// outcome code.
    fn diagnose(&self, complaint: ComplaintId) -> Result<String, DiagnosticError>;
}
