//! Shared fixtures for the complaint-side unit tests.

use aegis_contracts::{
    AuthorityDirectory, ContractLedger, ContractTerms, ContractTier, Currency, IdentityRegistry,
    Role,
};
use aegis_core::{AccountId, Amount, ContractId, DeviceId, InMemoryBank};

/// A contract ledger holding exactly one contract (id 0) owned by
/// `alice`, serviced by `P1`.
pub(crate) fn contracts_with_one_contract() -> (ContractLedger, ContractId) {
    let mut registry = IdentityRegistry::new();
    registry.register(&AccountId::new("alice"), Role::Customer, None);
    registry.register(&AccountId::new("P1"), Role::Provider, None);

    let mut authority = AuthorityDirectory::new();
    authority.set_authority(AccountId::new("A1")).unwrap();

    let mut bank = InMemoryBank::new();
    bank.mint(&AccountId::new("alice"), Amount(10_000));

    let mut ledger = ContractLedger::new();
    let id = ledger
        .create(
            &AccountId::new("alice"),
            ContractTerms {
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
            },
            &registry,
            &authority,
            &mut bank,
        )
        .unwrap();
    (ledger, id)
}
