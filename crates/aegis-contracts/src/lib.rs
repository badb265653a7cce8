//! # aegis-contracts — Service Contract Ledger
//!
//! The contract-side components of the Aegis Warranty Stack:
//!
//! - **IdentityRegistry** (`registry.rs`): maps a principal to a role
//!   (customer/provider) and optional device id. Latest write wins.
//!
//! - **AuthorityDirectory** (`authority.rs`): records the single trusted
//!   fee-collection authority. Settable exactly once.
//!
//! - **ContractLedger** (`contract.rs`): creates and mutates service
//!   contract records. Creation runs a strictly ordered validation chain
//!   (first failure wins), charges the creation fee to the authority,
//!   and binds the device id; at most one live contract per device at
//!   any time. Updates touch only provider/duration/premium and leave an
//!   audit record.
//!
//! - **Event log** (`event.rs`): append-only `contract-created` /
//!   `contract-updated` events for off-chain observers.
//!
//! ## Error Codes
//!
//! Every failure carries a stable numeric wire code (`Error::code()`);
//! external callers match on these codes for UX messages, so they must
//! not change across versions. Contract-ledger codes occupy the 1xx
//! range, registry 200, authority 21x.

pub mod authority;
pub mod contract;
pub mod event;
pub mod registry;

// ─── Registry re-exports ────────────────────────────────────────────

pub use registry::{IdentityRegistry, RegistryError, Role, UserRecord};

// ─── Authority re-exports ───────────────────────────────────────────

pub use authority::{AuthorityDirectory, AuthorityError};

// ─── Contract ledger re-exports ─────────────────────────────────────

pub use contract::{
    ContractError, ContractLedger, ContractTerms, ContractTier, ContractUpdate, Currency,
    ServiceContract,
};

// ─── Event re-exports ───────────────────────────────────────────────

pub use event::{ContractEvent, ContractEventKind};
