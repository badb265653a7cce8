//! # aegis-oracle — Diagnostic Provider Capability
//!
//! Defines the abstract interface to off-chain laptop diagnostic
//! services, plus deterministic mock providers for tests and Phase 1
//! deployments (behind the default `mock` feature).
//!
//! The monitoring adapter depends only on the [`DiagnosticProvider`]
//! trait, never on a concrete provider — mock and real providers are
//! interchangeable at compile time. The concrete transport used to
//! reach a real diagnostic service is out of scope for this workspace.

pub mod traits;

#[cfg(feature = "mock")]
pub mod mock;

pub use traits::{DiagnosticError, DiagnosticProvider, RESOLVED_OUTCOME};

#[cfg(feature = "mock")]
pub use mock::{FixedOracle, UnavailableOracle};
