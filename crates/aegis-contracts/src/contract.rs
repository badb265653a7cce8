//! # Service Contract Ledger
//!
//! Creates and mutates service-contract records. Contract creation runs
//! a strictly ordered validation chain — the first failing check
//! determines the returned error code — then charges the creation fee
//! to the configured authority and writes the record as one atomic
//! unit. Updates may touch only provider, duration, and premium; every
//! other field is immutable post-creation.
//!
//! ## States
//!
//! ```text
//! nonexistent ──▶ active ──▶ active (update, self-loop)
//! ```
//!
//! There is no deletion or deactivation path; the `active` flag is
//! stored and exposed but no operation currently flips it off.
//!
//! ## Invariants
//!
//! - Contract ids are monotonic from 0 with no gaps and no reuse.
//! - A device id maps to at most one live contract at any time.
//! - The fee transfer and the record write are one atomic unit: if the
//!   transfer fails, no record is written; once the transfer succeeds,
//!   the remaining writes are infallible.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aegis_core::{AccountId, Amount, ContractId, DeviceId, Timestamp, TransferError, ValueTransfer};

use crate::authority::AuthorityDirectory;
use crate::event::{ContractEvent, ContractEventKind};
use crate::registry::IdentityRegistry;

// ─── Field Bounds ────────────────────────────────────────────────────

/// Maximum length of the coverage-type string.
pub const MAX_COVERAGE_TYPE_LEN: usize = 50;
/// Maximum length of a device identifier.
pub const MAX_DEVICE_ID_LEN: usize = 100;
/// Maximum service threshold (percent).
pub const MAX_THRESHOLD: u8 = 100;
/// Maximum interest rate (percent).
pub const MAX_INTEREST_RATE: u8 = 20;
/// Maximum grace period (days).
pub const MAX_GRACE_PERIOD: u8 = 30;

/// Default contract-creation fee, adjustable by the authority.
pub const DEFAULT_CREATION_FEE: Amount = Amount(100);
/// Default contract-count cap, adjustable by the authority.
pub const DEFAULT_MAX_CONTRACTS: u64 = 1000;

// ─── Closed Enumerations ─────────────────────────────────────────────

/// The contract tier. Wire strings are lowercase
/// (`basic`, `premium`, `enterprise`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractTier {
    /// Entry-level coverage.
    Basic,
    /// Extended coverage.
    Premium,
    /// Fleet coverage.
    Enterprise,
}

impl ContractTier {
    /// Parse a tier from its wire string. Unknown strings are rejected
    /// with [`ContractError::InvalidContractTier`] — the typo class the
    /// closed enum eliminates internally.
    pub fn parse(s: &str) -> Result<Self, ContractError> {
        match s {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(ContractError::InvalidContractTier(other.to_string())),
        }
    }
}

impl std::fmt::Display for ContractTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Enterprise => "enterprise",
        };
        f.write_str(s)
    }
}

/// Settlement currency. Wire strings are `native`, `USD`, `BTC`;
/// `native-token` is accepted as a parse alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// The environment's native settlement token.
    #[serde(rename = "native")]
    Native,
    /// US dollar denominated.
    #[serde(rename = "USD")]
    Usd,
    /// Bitcoin denominated.
    #[serde(rename = "BTC")]
    Btc,
}

impl Currency {
    /// Parse a currency from its wire string.
    pub fn parse(s: &str) -> Result<Self, ContractError> {
        match s {
            "native" | "native-token" => Ok(Self::Native),
            "USD" => Ok(Self::Usd),
            "BTC" => Ok(Self::Btc),
            other => Err(ContractError::InvalidCurrency(other.to_string())),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Native => "native",
            Self::Usd => "USD",
            Self::Btc => "BTC",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by the contract ledger.
///
/// Each variant carries a stable numeric wire code (see [`Self::code`]).
/// Validation variants map one-to-one onto the ordered creation checks.
#[derive(Error, Debug)]
pub enum ContractError {
    /// The configured contract-count cap is reached.
    #[error("contract cap reached ({max})")]
    MaxContractsReached {
        /// The configured cap.
        max: u64,
    },

    /// The provider principal is reserved/null.
    #[error("invalid provider principal")]
    InvalidProvider,

    /// The duration must be positive.
    #[error("invalid duration: must be positive")]
    InvalidDuration,

    /// The premium must be positive.
    #[error("invalid premium: must be positive")]
    InvalidPremium,

    /// The coverage-type string is empty or too long.
    #[error("invalid coverage type: length {len} not in 1..={MAX_COVERAGE_TYPE_LEN}")]
    InvalidCoverage {
        /// Observed string length.
        len: usize,
    },

    /// The threshold is out of range.
    #[error("invalid threshold: {value} not in 1..={MAX_THRESHOLD}")]
    InvalidThreshold {
        /// Observed value.
        value: u8,
    },

    /// The contract-tier string is not a recognized tier.
    #[error("invalid contract tier: {0:?}")]
    InvalidContractTier(String),

    /// The interest rate is out of range.
    #[error("invalid interest rate: {value} exceeds {MAX_INTEREST_RATE}")]
    InvalidInterestRate {
        /// Observed value.
        value: u8,
    },

    /// The grace period is out of range.
    #[error("invalid grace period: {value} exceeds {MAX_GRACE_PERIOD} days")]
    InvalidGracePeriod {
        /// Observed value.
        value: u8,
    },

    /// The device identifier is empty or too long.
    #[error("invalid device id: length {len} not in 1..={MAX_DEVICE_ID_LEN}")]
    InvalidDeviceId {
        /// Observed string length.
        len: usize,
    },

    /// The currency string is not a recognized currency.
    #[error("invalid currency: {0:?}")]
    InvalidCurrency(String),

    /// The minimum premium must be positive.
    #[error("invalid minimum premium: must be positive")]
    InvalidMinPremium,

    /// The maximum coverage must be positive.
    #[error("invalid maximum coverage: must be positive")]
    InvalidMaxCoverage,

    /// The caller has no identity-registry record.
    #[error("caller {caller} is not a registered identity")]
    CallerNotRegistered {
        /// The unregistered caller.
        caller: AccountId,
    },

    /// The device is already bound to a live contract.
    #[error("device {device} already covered by {holder}")]
    DeviceAlreadyCovered {
        /// The contested device.
        device: DeviceId,
        /// The contract currently holding the binding.
        holder: ContractId,
    },

    /// No fee-collection authority has been configured.
    #[error("no authority configured")]
    AuthorityNotVerified,

    /// The creation-fee transfer failed; nothing was written.
    #[error("creation fee transfer failed: {0}")]
    FeeTransfer(#[from] TransferError),

    /// No contract with the given id.
    #[error("contract not found: {0}")]
    ContractNotFound(ContractId),

    /// The caller does not own the contract.
    #[error("caller {caller} is not the contract owner")]
    NotAuthorized {
        /// The rejected caller.
        caller: AccountId,
    },
}

impl ContractError {
    /// Stable numeric wire code for this error. External callers match
    /// on these codes; they must not change across versions.
    pub fn code(&self) -> u32 {
        match self {
            Self::MaxContractsReached { .. } => 100,
            Self::InvalidProvider => 101,
            Self::InvalidDuration => 102,
            Self::InvalidPremium => 103,
            Self::InvalidCoverage { .. } => 104,
            Self::InvalidThreshold { .. } => 105,
            Self::InvalidContractTier(_) => 106,
            Self::InvalidInterestRate { .. } => 107,
            Self::InvalidGracePeriod { .. } => 108,
            Self::InvalidDeviceId { .. } => 109,
            Self::InvalidCurrency(_) => 110,
            Self::InvalidMinPremium => 111,
            Self::InvalidMaxCoverage => 112,
            Self::CallerNotRegistered { .. } => 113,
            Self::DeviceAlreadyCovered { .. } => 114,
            Self::AuthorityNotVerified => 115,
            Self::FeeTransfer(_) => 116,
            Self::ContractNotFound(_) => 117,
            Self::NotAuthorized { .. } => 118,
        }
    }
}

// ─── Records ─────────────────────────────────────────────────────────

/// The terms requested for a new contract.
///
/// Tier and currency arrive here already parsed into closed enums; the
/// wire boundary rejects unknown strings via [`ContractTier::parse`] and
/// [`Currency::parse`] with the same error codes the string checks
/// carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractTerms {
    /// The servicing provider.
    pub provider: AccountId,
    /// Coverage duration in days.
    pub duration_days: u64,
    /// Premium charged for the coverage.
    pub premium: Amount,
    /// Free-text coverage descriptor (1–50 chars).
    pub coverage_type: String,
    /// Service threshold percent (1–100).
    pub threshold: u8,
    /// Contract tier.
    pub tier: ContractTier,
    /// Interest rate percent (0–20).
    pub interest_rate: u8,
    /// Grace period in days (0–30).
    pub grace_period_days: u8,
    /// The covered device (1–100 chars, unique across live contracts).
    pub device_id: DeviceId,
    /// Settlement currency.
    pub currency: Currency,
    /// Minimum premium for this contract class.
    pub min_premium: Amount,
    /// Maximum coverage payout.
    pub max_coverage: Amount,
}

/// A service contract record. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceContract {
    /// Ledger-assigned identifier.
    pub id: ContractId,
    /// The principal that created the contract.
    pub owner: AccountId,
    /// The servicing provider.
    pub provider: AccountId,
    /// When coverage started.
    pub start_time: Timestamp,
    /// Coverage duration in days.
    pub duration_days: u64,
    /// Premium charged for the coverage.
    pub premium: Amount,
    /// Free-text coverage descriptor.
    pub coverage_type: String,
    /// Service threshold percent.
    pub threshold: u8,
    /// Contract tier.
    pub tier: ContractTier,
    /// Interest rate percent.
    pub interest_rate: u8,
    /// Grace period in days.
    pub grace_period_days: u8,
    /// The covered device.
    pub device_id: DeviceId,
    /// Settlement currency.
    pub currency: Currency,
    /// Active flag.
    pub active: bool,
    /// Minimum premium for this contract class.
    pub min_premium: Amount,
    /// Maximum coverage payout.
    pub max_coverage: Amount,
    /// Last time the record was touched (creation or update).
    pub updated_at: Timestamp,
}

/// Audit record for the latest update of a contract. One per contract;
/// each update overwrites the previous record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractUpdate {
    /// Provider after the update.
    pub provider: AccountId,
    /// Duration after the update.
    pub duration_days: u64,
    /// Premium after the update.
    pub premium: Amount,
    /// When the update happened.
    pub timestamp: Timestamp,
    /// Who performed the update (always the owner).
    pub updater: AccountId,
}

// ─── Ledger ──────────────────────────────────────────────────────────

/// The service-contract ledger.
#[derive(Debug)]
pub struct ContractLedger {
    contracts: BTreeMap<u64, ServiceContract>,
    device_index: HashMap<DeviceId, ContractId>,
    updates: HashMap<u64, ContractUpdate>,
    events: Vec<ContractEvent>,
    next_id: u64,
    creation_fee: Amount,
    max_contracts: u64,
}

impl Default for ContractLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractLedger {
    /// Create an empty ledger with default fee and cap.
    pub fn new() -> Self {
        Self {
            contracts: BTreeMap::new(),
            device_index: HashMap::new(),
            updates: HashMap::new(),
            events: Vec::new(),
            next_id: 0,
            creation_fee: DEFAULT_CREATION_FEE,
            max_contracts: DEFAULT_MAX_CONTRACTS,
        }
    }

    /// Create a service contract.
    ///
    /// Runs the ordered validation chain (first failure wins), then
    /// transfers the creation fee from `caller` to the configured
    /// authority, then writes the record, binds the device, and emits a
    /// `contract-created` event. A failed fee transfer writes nothing.
    pub fn create(
        &mut self,
        caller: &AccountId,
        terms: ContractTerms,
        registry: &IdentityRegistry,
        authority: &AuthorityDirectory,
        bank: &mut dyn ValueTransfer,
    ) -> Result<ContractId, ContractError> {
        // Ordered validation chain; the position of each check fixes
        // which code a multi-fault request reports.
        if self.count() >= self.max_contracts {
            return Err(ContractError::MaxContractsReached {
                max: self.max_contracts,
            });
        }
        Self::validate_provider(&terms.provider)?;
        Self::validate_duration(terms.duration_days)?;
        Self::validate_premium(terms.premium)?;
        let coverage_len = terms.coverage_type.chars().count();
        if coverage_len == 0 || coverage_len > MAX_COVERAGE_TYPE_LEN {
            return Err(ContractError::InvalidCoverage { len: coverage_len });
        }
        if terms.threshold == 0 || terms.threshold > MAX_THRESHOLD {
            return Err(ContractError::InvalidThreshold {
                value: terms.threshold,
            });
        }
        // Tier is a closed enum; the wire boundary already rejected
        // unknown strings with code 106.
        if terms.interest_rate > MAX_INTEREST_RATE {
            return Err(ContractError::InvalidInterestRate {
                value: terms.interest_rate,
            });
        }
        if terms.grace_period_days > MAX_GRACE_PERIOD {
            return Err(ContractError::InvalidGracePeriod {
                value: terms.grace_period_days,
            });
        }
        let device_len = terms.device_id.as_str().chars().count();
        if device_len == 0 || device_len > MAX_DEVICE_ID_LEN {
            return Err(ContractError::InvalidDeviceId { len: device_len });
        }
        // Currency is a closed enum; unknown strings were rejected with
        // code 110 at parse.
        if terms.min_premium.is_zero() {
            return Err(ContractError::InvalidMinPremium);
        }
        if terms.max_coverage.is_zero() {
            return Err(ContractError::InvalidMaxCoverage);
        }
        if !registry.is_registered(caller) {
            return Err(ContractError::CallerNotRegistered {
                caller: caller.clone(),
            });
        }
        if let Some(holder) = self.device_index.get(&terms.device_id) {
            return Err(ContractError::DeviceAlreadyCovered {
                device: terms.device_id.clone(),
                holder: *holder,
            });
        }
        let fee_collector = authority
            .authority()
            .ok_or(ContractError::AuthorityNotVerified)?;

        // Last fallible step. If the transfer fails, nothing below runs
        // and the ledger is unchanged.
        bank.transfer(self.creation_fee, caller, fee_collector)?;

        let id = ContractId(self.next_id);
        let now = Timestamp::now();
        let contract = ServiceContract {
            id,
            owner: caller.clone(),
            provider: terms.provider,
            start_time: now,
            duration_days: terms.duration_days,
            premium: terms.premium,
            coverage_type: terms.coverage_type,
            threshold: terms.threshold,
            tier: terms.tier,
            interest_rate: terms.interest_rate,
            grace_period_days: terms.grace_period_days,
            device_id: terms.device_id.clone(),
            currency: terms.currency,
            active: true,
            min_premium: terms.min_premium,
            max_coverage: terms.max_coverage,
            updated_at: now,
        };
        self.device_index.insert(terms.device_id, id);
        self.contracts.insert(id.index(), contract);
        self.next_id += 1;
        self.events
            .push(ContractEvent::now(ContractEventKind::ContractCreated, id));
        tracing::debug!(contract = %id, owner = %caller, fee = %self.creation_fee, "contract created");
        Ok(id)
    }

    /// Update a contract's provider, duration, and premium.
    ///
    /// Only the owner may update, and only those three fields (plus the
    /// touch timestamp) change. Each call overwrites the per-contract
    /// [`ContractUpdate`] audit record and emits a `contract-updated`
    /// event.
    pub fn update(
        &mut self,
        caller: &AccountId,
        id: ContractId,
        provider: AccountId,
        duration_days: u64,
        premium: Amount,
    ) -> Result<(), ContractError> {
        let contract = self
            .contracts
            .get(&id.index())
            .ok_or(ContractError::ContractNotFound(id))?;
        if &contract.owner != caller {
            return Err(ContractError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        Self::validate_provider(&provider)?;
        Self::validate_duration(duration_days)?;
        Self::validate_premium(premium)?;

        let now = Timestamp::now();
        // All checks passed; the writes below are infallible.
        let contract = self
            .contracts
            .get_mut(&id.index())
            .ok_or(ContractError::ContractNotFound(id))?;
        contract.provider = provider.clone();
        contract.duration_days = duration_days;
        contract.premium = premium;
        contract.updated_at = now;
        self.updates.insert(
            id.index(),
            ContractUpdate {
                provider,
                duration_days,
                premium,
                timestamp: now,
                updater: caller.clone(),
            },
        );
        self.events
            .push(ContractEvent::now(ContractEventKind::ContractUpdated, id));
        tracing::debug!(contract = %id, updater = %caller, "contract updated");
        Ok(())
    }

    /// Set the creation fee. Only the configured authority may call.
    pub fn set_creation_fee(
        &mut self,
        caller: &AccountId,
        fee: Amount,
        authority: &AuthorityDirectory,
    ) -> Result<(), ContractError> {
        self.require_authority(caller, authority)?;
        self.creation_fee = fee;
        Ok(())
    }

    /// Set the contract-count cap. Only the configured authority may call.
    pub fn set_max_contracts(
        &mut self,
        caller: &AccountId,
        max: u64,
        authority: &AuthorityDirectory,
    ) -> Result<(), ContractError> {
        self.require_authority(caller, authority)?;
        self.max_contracts = max;
        Ok(())
    }

    /// Look up a contract record.
    pub fn get(&self, id: ContractId) -> Option<&ServiceContract> {
        self.contracts.get(&id.index())
    }

    /// Whether a contract with the given id exists.
    pub fn exists(&self, id: ContractId) -> bool {
        self.contracts.contains_key(&id.index())
    }

    /// Number of contracts ever created.
    pub fn count(&self) -> u64 {
        self.contracts.len() as u64
    }

    /// The contract currently covering a device, if any.
    pub fn contract_for_device(&self, device: &DeviceId) -> Option<ContractId> {
        self.device_index.get(device).copied()
    }

    /// Whether any live contract covers the device.
    pub fn exists_for_device(&self, device: &DeviceId) -> bool {
        self.device_index.contains_key(device)
    }

    /// The latest update audit record for a contract, if any.
    pub fn last_update(&self, id: ContractId) -> Option<&ContractUpdate> {
        self.updates.get(&id.index())
    }

    /// The append-only event log.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// The current creation fee.
    pub fn creation_fee(&self) -> Amount {
        self.creation_fee
    }

    /// The current contract-count cap.
    pub fn max_contracts(&self) -> u64 {
        self.max_contracts
    }

    /// Gate for the privileged setters: an authority must be configured
    /// and the caller must be it.
    fn require_authority(
        &self,
        caller: &AccountId,
        authority: &AuthorityDirectory,
    ) -> Result<(), ContractError> {
        match authority.authority() {
            None => Err(ContractError::AuthorityNotVerified),
            Some(a) if a != caller => Err(ContractError::NotAuthorized {
                caller: caller.clone(),
            }),
            Some(_) => Ok(()),
        }
    }

    fn validate_provider(provider: &AccountId) -> Result<(), ContractError> {
        if provider.is_reserved() {
            return Err(ContractError::InvalidProvider);
        }
        Ok(())
    }

    fn validate_duration(duration_days: u64) -> Result<(), ContractError> {
        if duration_days == 0 {
            return Err(ContractError::InvalidDuration);
        }
        Ok(())
    }

    fn validate_premium(premium: Amount) -> Result<(), ContractError> {
        if premium.is_zero() {
            return Err(ContractError::InvalidPremium);
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────


#[cfg(test)]
mod properties {
    use super::*;
    use crate::registry::Role;
    use aegis_core::InMemoryBank;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_valid_terms_yield_monotonic_ids(
            seeds in proptest::collection::vec((1u64..10_000, 1u64..1_000_000, 1u8..=100u8), 1..20)
        ) {
            let mut registry = IdentityRegistry::new();
            registry.register(&AccountId::new("alice"), Role::Customer, None);
            let mut authority = AuthorityDirectory::new();
            authority.set_authority(AccountId::new("A1")).unwrap();
            let mut bank = InMemoryBank::new();
            bank.mint(&AccountId::new("alice"), Amount(u64::MAX / 2));
            let mut ledger = ContractLedger::new();

            for (n, (duration, premium, threshold)) in seeds.iter().enumerate() {
                let terms = ContractTerms {
                    provider: AccountId::new("P1"),
                    duration_days: *duration,
                    premium: Amount(*premium),
                    coverage_type: "full".to_string(),
                    threshold: *threshold,
                    tier: ContractTier::Basic,
                    interest_rate: 0,
                    grace_period_days: 0,
                    device_id: DeviceId::new(format!("DEV{n}")),
                    currency: Currency::Native,
                    min_premium: Amount(1),
                    max_coverage: Amount(1),
                };
                let id = ledger
                    .create(&AccountId::new("alice"), terms, &registry, &authority, &mut bank)
                    .unwrap();
                prop_assert_eq!(id, ContractId(n as u64));
            }
            prop_assert_eq!(ledger.count(), seeds.len() as u64);
        }

        #[test]
        fn prop_duplicate_device_always_conflicts(
            duration in 1u64..10_000,
            premium in 1u64..1_000_000,
            threshold in 1u8..=100u8,
        ) {
            let mut registry = IdentityRegistry::new();
            registry.register(&AccountId::new("alice"), Role::Customer, None);
            let mut authority = AuthorityDirectory::new();
            authority.set_authority(AccountId::new("A1")).unwrap();
            let mut bank = InMemoryBank::new();
            bank.mint(&AccountId::new("alice"), Amount(1_000_000));
            let mut ledger = ContractLedger::new();

            let base = ContractTerms {
                provider: AccountId::new("P1"),
                duration_days: 365,
                premium: Amount(500),
                coverage_type: "full".to_string(),
                threshold: 80,
                tier: ContractTier::Premium,
                interest_rate: 5,
                grace_period_days: 14,
                device_id: DeviceId::new("DEV1"),
                currency: Currency::Native,
                min_premium: Amount(100),
                max_coverage: Amount(10_000),
            };
            ledger
                .create(&AccountId::new("alice"), base.clone(), &registry, &authority, &mut bank)
                .unwrap();

            // Same device, arbitrary other fields: always the conflict code.
            let mut second = base;
            second.duration_days = duration;
            second.premium = Amount(premium);
            second.threshold = threshold;
            let err = ledger
                .create(&AccountId::new("alice"), second, &registry, &authority, &mut bank)
                .unwrap_err();
            prop_assert_eq!(err.code(), 114);
        }
    }
}
