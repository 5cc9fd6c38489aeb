//! Contract and determinism tests for engine decisions.
//!
//! - Contract: snapshot bundles parse from the documented JSON shape, and
//!   decisions serialize with stable snake_case field names.
//! - Determinism: the same bundle always yields byte-identical output, on any thread.

use dpo_engine::engine::{ActionKind, Caller};
use dpo_engine::{BlockNumber, DecisionEngine, EngineConfig, Phase, SnapshotBundle};
use serde_json::Value;
use std::collections::HashMap;

// =============================================================================
// Fixtures
// =============================================================================

const RUNNING_CABIN_BUNDLE: &str = r#"{
    "block_height": 3000,
    "dpo": {
        "index": 1,
        "state": "running",
        "target": { "travel_cabin": 7 },
        "token": "BOLT",
        "manager": "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY",
        "amount_per_seat": "100000000000000000000",
        "target_amount": "10000000000000000000000",
        "target_maturity": 10000,
        "target_bonus_estimate": "200000000000000000000",
        "target_yield_estimate": "1000000000000000000000",
        "total_yield_received": "0",
        "total_bonus_received": "200000000000000000000",
        "empty_seats": 0,
        "fee_bps": 50,
        "direct_referral_rate_bps": 10,
        "expiry_blk": 500,
        "vault_deposit": "0",
        "vault_bonus": "200000000000000000000",
        "vault_yield": "0",
        "vault_withdraw": "0",
        "blk_of_dpo_filled": 1000
    },
    "target": {
        "kind": "travel_cabin",
        "cabin": {
            "index": 7,
            "token": "BOLT",
            "deposit_amount": "10000000000000000000000",
            "maturity": 10000,
            "yield_total": "1000000000000000000000"
        },
        "inventory": { "sold": 10, "total": 10 },
        "buyer": {
            "inventory_index": 3,
            "buyer": { "dpo": 1 },
            "purchase_blk": 2000,
            "yield_withdrawn": "0",
            "fare_withdrawn": false,
            "blk_of_last_withdraw": 2000
        }
    }
}"#;

fn bundle() -> SnapshotBundle {
    serde_json::from_str(RUNNING_CABIN_BUNDLE).expect("fixture should parse")
}

// =============================================================================
// Contract
// =============================================================================

#[test]
fn test_bundle_fixture_parses() {
    let bundle = bundle();
    assert_eq!(bundle.block_height, BlockNumber::new(3000));
    assert_eq!(bundle.dpo.index, 1);
    assert!(bundle.target.is_some());
}

#[test]
fn test_decision_field_names() {
    let decision = DecisionEngine::default().decide(&bundle());
    let json: Value = serde_json::to_value(&decision).unwrap();

    for field in ["dpo_index", "block_height", "phase", "actions", "metrics", "notices"] {
        assert!(json.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(json["phase"], "running");

    let action = &json["actions"][0];
    assert_eq!(action["kind"], "withdraw_yield_from_cabin");
    assert_eq!(action["status"], "ready");
    assert_eq!(action["caller"], "manager");
    assert_eq!(
        action["required_params"]["method"],
        "withdraw_yield_from_travel_cabin"
    );
    assert_eq!(
        action["required_params"]["args"][1],
        serde_json::json!({ "type": "inventory_slot", "value": 3 })
    );
    assert_eq!(action["grace_period"]["obligation"], "cabin_withdrawal");
    assert_eq!(action["grace_period"]["tip_key"], "grace.cabin_withdrawal.tip");

    // Balances travel as strings.
    assert_eq!(
        json["metrics"]["cabin_withdrawable_yield"],
        "100000000000000000000"
    );
}

#[test]
fn test_running_cabin_decision() {
    let decision = DecisionEngine::default().decide(&bundle());
    assert_eq!(decision.phase, Phase::Running);
    assert_eq!(
        decision.actions.iter().map(|a| a.kind).collect::<Vec<_>>(),
        vec![
            ActionKind::WithdrawYieldFromCabin,
            ActionKind::ReleaseBonusToMembers
        ]
    );
    assert!(decision.actions.iter().all(|a| a.enabled));
    assert_eq!(
        decision.action(ActionKind::WithdrawYieldFromCabin).unwrap().caller,
        Caller::Manager
    );
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_bundle_same_bytes() {
    let engine = DecisionEngine::default();
    let bundle = bundle();

    let first = serde_json::to_vec(&engine.decide(&bundle)).unwrap();
    let second = serde_json::to_vec(&engine.decide(&bundle)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_decide_does_not_mutate_input() {
    let engine = DecisionEngine::default();
    let bundle = bundle();
    let before = bundle.clone();
    let _ = engine.decide(&bundle);
    assert_eq!(bundle, before);
}

#[test]
fn test_fingerprint_stable_across_threads() {
    let engine = DecisionEngine::default();
    let bundle = bundle();
    let expected = engine.decide(&bundle).fingerprint().unwrap();

    let (engine, bundle) = (&engine, &bundle);
    let fingerprints: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(move || engine.decide(bundle).fingerprint().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(fingerprints.iter().all(|f| *f == expected));
}

#[test]
fn test_fingerprint_changes_with_block_height() {
    let engine = DecisionEngine::default();
    let mut bundle = bundle();
    let at_3000 = engine.decide(&bundle).fingerprint().unwrap();

    bundle.block_height = BlockNumber::new(3001);
    let at_3001 = engine.decide(&bundle).fingerprint().unwrap();
    assert_ne!(at_3000, at_3001);
}

#[test]
fn test_config_changes_deadlines_not_actions() {
    let bundle = bundle();
    let mut vars = HashMap::new();
    vars.insert("DPO_CABIN_WITHDRAW_GRACE_BLOCKS".to_string(), "500".to_string());
    let config = EngineConfig::from_env_map(vars).unwrap();

    let default = DecisionEngine::default().decide(&bundle);
    let short = DecisionEngine::new(config).decide(&bundle);

    let kinds = |d: &dpo_engine::Decision| d.actions.iter().map(|a| a.kind).collect::<Vec<_>>();
    assert_eq!(kinds(&default), kinds(&short));

    // 2000 + 500 < 3000: the shortened window has lapsed.
    let action = short.action(ActionKind::WithdrawYieldFromCabin).unwrap();
    assert_eq!(action.grace_period.as_ref().unwrap().blocks_remaining, -500);
    assert_eq!(action.caller, Caller::Anyone);
}
