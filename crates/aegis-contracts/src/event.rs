//! # Contract Event Log
//!
//! Append-only events emitted by the contract ledger on successful
//! creation and update. Consumed by off-chain observers (indexers,
//! dashboards), never read back by the ledgers themselves.

use serde::{Deserialize, Serialize};

use aegis_core::{ContractId, Timestamp};

/// The kind of a contract event. Wire strings are kebab-case
/// (`contract-created`, `contract-updated`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContractEventKind {
    /// A contract record was created.
    ContractCreated,
    /// A contract record was updated.
    ContractUpdated,
}

impl std::fmt::Display for ContractEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ContractCreated => "contract-created",
            Self::ContractUpdated => "contract-updated",
        };
        f.write_str(s)
    }
}

/// A structured ledger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEvent {
    /// What happened.
    pub kind: ContractEventKind,
    /// The contract the event refers to.
    pub contract_id: ContractId,
    /// When the event was appended.
    pub timestamp: Timestamp,
}

impl ContractEvent {
    /// Build an event stamped with the current time.
    pub fn now(kind: ContractEventKind, contract_id: ContractId) -> Self {
        Self {
            kind,
            contract_id,
            timestamp: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_wire_strings() {
        assert_eq!(
            serde_json::to_string(&ContractEventKind::ContractCreated).unwrap(),
            "\"contract-created\""
        );
        assert_eq!(
            serde_json::to_string(&ContractEventKind::ContractUpdated).unwrap(),
            "\"contract-updated\""
        );
    }

    #[test]
    fn test_event_display() {
        assert_eq!(
            ContractEventKind::ContractCreated.to_string(),
            "contract-created"
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = ContractEvent::now(ContractEventKind::ContractCreated, ContractId(0));
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ContractEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
