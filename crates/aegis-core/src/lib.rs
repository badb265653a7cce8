//! # aegis-core — Foundational Types for the Aegis Warranty Stack
//!
//! This crate is the bedrock of the Aegis Warranty Stack. It defines the
//! type-system primitives every other crate in the workspace builds on;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `AccountId`, `ContractId`,
//!    `ComplaintId`, `DeviceId` — you cannot pass a complaint id where a
//!    contract id is expected. No bare integers or strings for identifiers.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, so every ledger record carries the
//!    same deterministic time representation.
//!
//! 3. **Value transfer as a capability.** Fund movement flows through the
//!    `ValueTransfer` trait; ledgers never touch balances directly. The
//!    in-memory settlement backend and any external one are
//!    interchangeable at compile time.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `aegis-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a wire boundary.

pub mod funds;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use funds::{Amount, InMemoryBank, TransferError, ValueTransfer};
pub use identity::{AccountId, ComplaintId, ContractId, DeviceId};
pub use temporal::Timestamp;
