//! # Identity Registry
//!
//! Maps a caller principal to a role (customer or provider) and an
//! optional device identifier. One record per principal; registration
//! is an idempotent upsert and the latest write wins — no history is
//! kept.
//!
//! Roles are a closed enum. Unknown role strings are rejected at the
//! wire boundary by [`Role::parse`] rather than stored as-is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aegis_core::{AccountId, DeviceId, Timestamp};

// ─── Role ────────────────────────────────────────────────────────────

/// The role a principal plays in the warranty lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Owns devices and files complaints.
    Customer,
    /// Services contracts and interventions.
    Provider,
}

impl Role {
    /// Parse a role from its wire string.
    ///
    /// Only `customer` and `provider` are recognized; anything else is
    /// rejected with [`RegistryError::InvalidRole`].
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        match s {
            "customer" => Ok(Self::Customer),
            "provider" => Ok(Self::Provider),
            other => Err(RegistryError::InvalidRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Customer => "customer",
            Self::Provider => "provider",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by the identity registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The role string is not one of the recognized values.
    #[error("unrecognized role: {0:?}")]
    InvalidRole(String),
}

impl RegistryError {
    /// Stable numeric wire code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidRole(_) => 200,
        }
    }
}

// ─── Records ─────────────────────────────────────────────────────────

/// A registered principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// The registered principal.
    pub account: AccountId,
    /// The principal's role.
    pub role: Role,
    /// Optional device owned by the principal.
    pub device_id: Option<DeviceId>,
    /// When this record was last written.
    pub registered_at: Timestamp,
}

// ─── Registry ────────────────────────────────────────────────────────

/// The identity registry. One record per principal, latest write wins.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    users: HashMap<AccountId, UserRecord>,
}

impl IdentityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) the caller with a role and optional
    /// device. Overwrites any prior record for the principal.
    pub fn register(&mut self, caller: &AccountId, role: Role, device_id: Option<DeviceId>) {
        let record = UserRecord {
            account: caller.clone(),
            role,
            device_id,
            registered_at: Timestamp::now(),
        };
        tracing::debug!(account = %caller, %role, "identity registered");
        self.users.insert(caller.clone(), record);
    }

    /// Look up the record for a principal.
    pub fn lookup(&self, account: &AccountId) -> Option<&UserRecord> {
        self.users.get(account)
    }

    /// Whether the principal has a registry record.
    pub fn is_registered(&self, account: &AccountId) -> bool {
        self.users.contains_key(account)
    }

    /// Number of registered principals.
    pub fn count(&self) -> usize {
        self.users.len()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
