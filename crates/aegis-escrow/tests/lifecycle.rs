//! End-to-end lifecycle tests across the whole stack: registration,
//! contract creation with fee routing, complaint filing, remote
//! monitoring, escalation and intervention, and escrow settlement.

use aegis_claims::{
    ComplaintLedger, ComplaintStatus, InterventionLedger, InterventionStatus, MonitoringAdapter,
    MonitoringOutcome,
};
use aegis_contracts::{
    AuthorityDirectory, ContractEventKind, ContractLedger, ContractTerms, ContractTier, Currency,
    IdentityRegistry, Role,
};
use aegis_core::{AccountId, Amount, ComplaintId, ContractId, DeviceId, InMemoryBank, ValueTransfer};
use aegis_escrow::{EscrowState, EscrowVault};
use aegis_oracle::FixedOracle;

fn acct(s: &str) -> AccountId {
    AccountId::new(s)
}

struct Stack {
    registry: IdentityRegistry,
    authority: AuthorityDirectory,
    bank: InMemoryBank,
    contracts: ContractLedger,
    complaints: ComplaintLedger,
    monitoring: MonitoringAdapter,
    interventions: InterventionLedger,
    vault: EscrowVault,
}

/// Provider "P1" and customer "alice" registered, authority "A1" set,
/// alice funded.
fn stack() -> Stack {
    let mut registry = IdentityRegistry::new();
    registry.register(&acct("P1"), Role::Provider, None);
    registry.register(&acct("alice"), Role::Customer, Some(DeviceId::new("DEV1")));

    let mut authority = AuthorityDirectory::new();
    authority.set_authority(acct("A1")).unwrap();

    let mut bank = InMemoryBank::new();
    bank.mint(&acct("alice"), Amount(50_000));

    Stack {
        registry,
        authority,
        bank,
        contracts: ContractLedger::new(),
        complaints: ComplaintLedger::new(),
        monitoring: MonitoringAdapter::new(),
        interventions: InterventionLedger::new(),
        vault: EscrowVault::new(acct("vault")),
    }
}

fn scenario_terms() -> ContractTerms {
    ContractTerms {
        provider: acct("P1"),
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
    }
}

fn create_contract(s: &mut Stack) -> ContractId {
    s.contracts
        .create(
            &acct("alice"),
            scenario_terms(),
            &s.registry,
            &s.authority,
            &mut s.bank,
        )
        .unwrap()
}

// ── Scenario A: create with fee routing ─────────────────────────────

#[test]
fn scenario_a_create_returns_id_zero_and_routes_fee() {
    let mut s = stack();
    let fee = s.contracts.creation_fee();
    let id = create_contract(&mut s);

    assert_eq!(id, ContractId(0));
    assert_eq!(s.bank.balance_of(&acct("A1")), fee);
    assert_eq!(s.bank.balance_of(&acct("alice")), Amount(50_000 - fee.units()));

    let events = s.contracts.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, ContractEventKind::ContractCreated);
    assert_eq!(events[0].contract_id, id);
}

// ── Scenario B: duplicate device conflicts ──────────────────────────

#[test]
fn scenario_b_duplicate_device_fails_with_conflict() {
    let mut s = stack();
    create_contract(&mut s);

    let err = s
        .contracts
        .create(
            &acct("alice"),
            scenario_terms(),
            &s.registry,
            &s.authority,
            &mut s.bank,
        )
        .unwrap_err();
    assert_eq!(err.code(), 114);
    assert_eq!(s.contracts.count(), 1);
}

// ── Scenario C: remote resolution and escrow release ────────────────

#[test]
fn scenario_c_resolution_and_release() {
    let mut s = stack();
    let contract = create_contract(&mut s);

    let complaint = s
        .complaints
        .file(&s.contracts, contract, "screen flicker")
        .unwrap();
    assert_eq!(complaint, ComplaintId(0));
    assert_eq!(s.complaints.status(complaint), Some(ComplaintStatus::Pending));

    s.vault
        .deposit(
            &mut s.bank,
            &acct("alice"),
            &s.complaints,
            complaint,
            Amount(1_000),
            acct("P1"),
        )
        .unwrap();

    let branch = s
        .monitoring
        .trigger(&mut s.complaints, complaint, &FixedOracle::resolving())
        .unwrap();
    assert_eq!(branch, MonitoringOutcome::Resolved);
    assert!(s.monitoring.result(complaint).unwrap().resolved);
    assert_eq!(s.complaints.status(complaint), Some(ComplaintStatus::Resolved));

    s.vault
        .release(&mut s.bank, &s.complaints, complaint)
        .unwrap();
    assert_eq!(s.bank.balance_of(&acct("P1")), Amount(1_000));
    assert_eq!(
        s.vault.get(complaint).unwrap().state,
        EscrowState::Released
    );

    // A second release must fail rather than re-transfer funds.
    let err = s
        .vault
        .release(&mut s.bank, &s.complaints, complaint)
        .unwrap_err();
    assert_eq!(err.code(), 602);
    assert_eq!(s.bank.balance_of(&acct("P1")), Amount(1_000));
}

// ── Scenario D: escalation gates intervention ───────────────────────

#[test]
fn scenario_d_escalation_then_intervention() {
    let mut s = stack();
    let contract = create_contract(&mut s);
    let complaint = s
        .complaints
        .file(&s.contracts, contract, "keyboard dead")
        .unwrap();

    // Dispatch before escalation fails the precondition.
    let err = s
        .interventions
        .dispatch(&s.complaints, complaint, acct("P1"))
        .unwrap_err();
    assert_eq!(err.code(), 500);

    let branch = s
        .monitoring
        .trigger(&mut s.complaints, complaint, &FixedOracle::new("unresolved"))
        .unwrap();
    assert_eq!(branch, MonitoringOutcome::Escalated);
    assert_eq!(
        s.complaints.status(complaint),
        Some(ComplaintStatus::Escalated)
    );

    // Only now does dispatch succeed.
    s.interventions
        .dispatch(&s.complaints, complaint, acct("P1"))
        .unwrap();
    s.interventions
        .complete(&mut s.complaints, complaint)
        .unwrap();

    let record = s.interventions.get(complaint).unwrap();
    assert_eq!(record.status, InterventionStatus::Completed);
    assert!(record.completion_time.is_some());
    assert_eq!(s.complaints.status(complaint), Some(ComplaintStatus::Resolved));
}

// ── Full lifecycle: escalation, intervention, then release ──────────

#[test]
fn full_lifecycle_escalated_complaint_settles_to_provider() {
    let mut s = stack();
    let contract = create_contract(&mut s);
    let complaint = s
        .complaints
        .file(&s.contracts, contract, "board failure")
        .unwrap();

    s.vault
        .deposit(
            &mut s.bank,
            &acct("alice"),
            &s.complaints,
            complaint,
            Amount(2_500),
            acct("P1"),
        )
        .unwrap();

    s.monitoring
        .trigger(&mut s.complaints, complaint, &FixedOracle::escalating())
        .unwrap();
    s.interventions
        .dispatch(&s.complaints, complaint, acct("P1"))
        .unwrap();
    s.interventions
        .complete(&mut s.complaints, complaint)
        .unwrap();

    s.vault
        .release(&mut s.bank, &s.complaints, complaint)
        .unwrap();
    assert_eq!(s.bank.balance_of(&acct("P1")), Amount(2_500));
    assert_eq!(s.bank.balance_of(&acct("vault")), Amount::ZERO);
}

// ── Dispute path: escalated complaint refunded to payer ─────────────

#[test]
fn dispute_path_refunds_payer() {
    let mut s = stack();
    let contract = create_contract(&mut s);
    let complaint = s
        .complaints
        .file(&s.contracts, contract, "intermittent shutdowns")
        .unwrap();

    s.vault
        .deposit(
            &mut s.bank,
            &acct("alice"),
            &s.complaints,
            complaint,
            Amount(2_000),
            acct("P1"),
        )
        .unwrap();
    s.monitoring
        .trigger(&mut s.complaints, complaint, &FixedOracle::escalating())
        .unwrap();

    s.vault
        .refund(&mut s.bank, &acct("alice"), &s.complaints, complaint)
        .unwrap();
    let fee = s.contracts.creation_fee();
    assert_eq!(
        s.bank.balance_of(&acct("alice")),
        Amount(50_000 - fee.units())
    );
    assert_eq!(s.vault.get(complaint).unwrap().state, EscrowState::Refunded);

    // Refund is terminal; the later resolution cannot release anything.
    s.interventions
        .dispatch(&s.complaints, complaint, acct("P1"))
        .unwrap();
    s.interventions
        .complete(&mut s.complaints, complaint)
        .unwrap();
    let err = s
        .vault
        .release(&mut s.bank, &s.complaints, complaint)
        .unwrap_err();
    assert_eq!(err.code(), 602);
}

// ── Cross-cutting: complaint ids independent of contract ids ────────

#[test]
fn complaint_ids_are_monotonic_across_contracts() {
    let mut s = stack();
    let c0 = create_contract(&mut s);
    let mut terms = scenario_terms();
    terms.device_id = DeviceId::new("DEV2");
    let c1 = s
        .contracts
        .create(&acct("alice"), terms, &s.registry, &s.authority, &mut s.bank)
        .unwrap();

    let k0 = s.complaints.file(&s.contracts, c1, "first").unwrap();
    let k1 = s.complaints.file(&s.contracts, c0, "second").unwrap();
    let k2 = s.complaints.file(&s.contracts, c1, "third").unwrap();
    assert_eq!((k0, k1, k2), (ComplaintId(0), ComplaintId(1), ComplaintId(2)));
}
