//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the Aegis Warranty
//! Stack. These prevent accidental identifier confusion — you cannot
//! pass a `ComplaintId` where a `ContractId` is expected.
//!
//! ## Security Invariant
//!
//! Type-level distinction between identifier namespaces prevents
//! cross-namespace confusion, where a caller substitutes one kind of
//! ledger key for another. Contract and complaint ids are monotonic
//! integers allocated by their owning ledger starting at 0; this crate
//! only defines the types, never allocates.

use serde::{Deserialize, Serialize};

/// Opaque principal identifier (caller, owner, provider, payer, payee).
///
/// The stack treats principals as opaque strings supplied by the
/// execution environment. One principal is reserved: the burn address,
/// which is rejected wherever a live counterparty is required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// The reserved burn principal. Never a valid provider, authority,
/// or payee.
const BURN_PRINCIPAL: &str = "burn:0000";

impl AccountId {
    /// Wrap a principal string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved burn principal.
    pub fn burn() -> Self {
        Self(BURN_PRINCIPAL.to_string())
    }

    /// Whether this is the reserved burn/null principal (or empty).
    pub fn is_reserved(&self) -> bool {
        self.0.is_empty() || self.0 == BURN_PRINCIPAL
    }

    /// Access the inner principal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a service contract (monotonic, 0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractId(pub u64);

/// Unique identifier for a complaint (monotonic, 0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComplaintId(pub u64);

/// Device identifier bound to a service contract.
///
/// At most one live contract may reference a given device id at a time;
/// the contract ledger enforces that invariant. Length bounds (1–100
/// chars) are validated at the ledger boundary so the validation order
/// and wire code stay with the operation that rejects the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub String);

impl ContractId {
    /// The raw ledger index.
    pub fn index(&self) -> u64 {
        self.0
    }
}

impl ComplaintId {
    /// The raw ledger index.
    pub fn index(&self) -> u64 {
        self.0
    }
}

impl DeviceId {
    /// Wrap a device identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the inner identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "contract:{}", self.0)
    }
}

impl std::fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "complaint:{}", self.0)
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "device:{}", self.0)
    }
}
