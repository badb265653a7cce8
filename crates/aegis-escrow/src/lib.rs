//! # aegis-escrow — Escrowed Payment Settlement
//!
//! Holds funds keyed by complaint id pending a resolution outcome, and
//! settles them exactly once: released to the payee when the complaint
//! resolves, or refunded to the payer on the dispute path.
//!
//! ## States
//!
//! ```text
//! none ──▶ deposited ──▶ released   (complaint resolved)
//!              │
//!              └───────▶ refunded   (dispute path: payer, escalated)
//! ```
//!
//! Both terminal states are distinct and final; a settled escrow can
//! never transfer again, which is what bounds vault outflow per
//! complaint to the amount deposited.

pub mod vault;

pub use vault::{EscrowAccount, EscrowError, EscrowState, EscrowVault};
