//! # Authority Directory
//!
//! Records the single trusted fee-collection authority. The authority
//! receives contract-creation fees and gates the privileged ledger
//! configuration setters.
//!
//! ## Invariant
//!
//! The authority is settable exactly once. There is no rotation path;
//! re-pointing fee collection would silently redirect funds, so a second
//! `set_authority` always fails.

use thiserror::Error;

use aegis_core::AccountId;

/// Errors raised by the authority directory.
#[derive(Error, Debug)]
pub enum AuthorityError {
    /// An authority has already been configured.
    #[error("authority already set to {current}")]
    AlreadySet {
        /// The configured authority.
        current: AccountId,
    },

    /// The reserved burn/null principal cannot be the authority.
    #[error("invalid authority principal")]
    InvalidAuthority,
}

impl AuthorityError {
    /// Stable numeric wire code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::AlreadySet { .. } => 210,
            Self::InvalidAuthority => 211,
        }
    }
}

/// The authority directory. Holds at most one trusted principal.
#[derive(Debug, Default)]
pub struct AuthorityDirectory {
    authority: Option<AccountId>,
}

impl AuthorityDirectory {
    /// Create a directory with no authority configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the trusted authority. Fails if one is already set or
    /// if the principal is reserved.
    pub fn set_authority(&mut self, account: AccountId) -> Result<(), AuthorityError> {
        if account.is_reserved() {
            return Err(AuthorityError::InvalidAuthority);
        }
        if let Some(current) = &self.authority {
            return Err(AuthorityError::AlreadySet {
                current: current.clone(),
            });
        }
        tracing::debug!(authority = %account, "authority configured");
        self.authority = Some(account);
        Ok(())
    }

    /// Whether the given principal is the configured authority.
    pub fn is_authority(&self, account: &AccountId) -> bool {
        self.authority.as_ref() == Some(account)
    }

    /// The configured authority, if any.
    pub fn authority(&self) -> Option<&AccountId> {
        self.authority.as_ref()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
