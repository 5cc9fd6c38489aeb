//! End-to-end evaluation through snapshot providers.

use dpo_engine::engine::{ActionKind, ActionStatus, Notice};
use dpo_engine::{
    AccountId, Balance, BlockNumber, Buyer, ChainState, DecisionEngine, DpoRecord, DpoState,
    EvaluationError, Evaluator, FileSnapshotProvider, InMemorySnapshotProvider, Phase,
    ProviderError, Target, TokenSymbol, TravelCabinBuyerRecord, TravelCabinInventory,
    TravelCabinRecord,
};
use std::sync::Arc;
use tempfile::TempDir;

const HEIGHT: u64 = 1_500;

fn dpo(index: u32, state: DpoState, target: Target) -> DpoRecord {
    DpoRecord {
        index,
        state,
        target,
        token: TokenSymbol::new("BOLT".to_string()),
        manager: AccountId::new("5Manager".to_string()),
        amount_per_seat: Balance::new(100),
        target_amount: Balance::new(10_000),
        target_maturity: 10_000,
        target_bonus_estimate: Balance::ZERO,
        target_yield_estimate: Balance::new(1_000),
        total_yield_received: Balance::ZERO,
        total_bonus_received: Balance::ZERO,
        empty_seats: 0,
        fee_bps: 50,
        direct_referral_rate_bps: 10,
        expiry_blk: BlockNumber::new(5_000),
        vault_deposit: Balance::new(10_000),
        vault_bonus: Balance::ZERO,
        vault_yield: Balance::ZERO,
        vault_withdraw: Balance::ZERO,
        blk_of_dpo_filled: Some(BlockNumber::new(1_000)),
        blk_of_last_yield: None,
    }
}

fn cabin(index: u32) -> TravelCabinRecord {
    TravelCabinRecord {
        index,
        token: TokenSymbol::new("BOLT".to_string()),
        deposit_amount: Balance::new(10_000),
        maturity: 10_000,
        yield_total: Balance::new(1_000),
        bonus_total: Balance::ZERO,
    }
}

fn crowdfunding(index: u32) -> DpoRecord {
    let mut record = dpo(index, DpoState::Created, Target::TravelCabin(8));
    record.empty_seats = 40;
    record.blk_of_dpo_filled = None;
    record
}

fn provider() -> InMemorySnapshotProvider {
    InMemorySnapshotProvider::new()
        .at_height(HEIGHT)
        // DPO 1 targets a sold-out cabin.
        .with_dpo(dpo(1, DpoState::Active, Target::TravelCabin(7)))
        // DPO 2 targets crowdfunding DPO 3.
        .with_dpo(dpo(2, DpoState::Active, Target::Dpo(3, 20)))
        .with_dpo(crowdfunding(3))
        // DPO 4 holds a slot of cabin 8.
        .with_dpo(dpo(4, DpoState::Running, Target::TravelCabin(8)))
        // DPO 5 targets a cabin class that does not exist.
        .with_dpo(dpo(5, DpoState::Active, Target::TravelCabin(99)))
        .with_cabin(cabin(7), TravelCabinInventory::new(10, 10))
        .with_cabin(cabin(8), TravelCabinInventory::new(1, 10))
        .with_buyer(
            8,
            TravelCabinBuyerRecord {
                inventory_index: 0,
                buyer: Buyer::Dpo(4),
                purchase_blk: BlockNumber::new(1_200),
                yield_withdrawn: Balance::ZERO,
                fare_withdrawn: false,
                blk_of_last_withdraw: BlockNumber::new(1_200),
            },
        )
}

fn evaluator(provider: InMemorySnapshotProvider) -> Evaluator {
    Evaluator::new(Arc::new(provider), DecisionEngine::default())
}

#[tokio::test]
async fn test_sold_out_cabin_target() {
    let decision = evaluator(provider()).evaluate(1).await.unwrap();
    assert_eq!(decision.block_height, BlockNumber::new(HEIGHT));
    assert_eq!(decision.phase, Phase::Active);
    assert_eq!(decision.actions[0].kind, ActionKind::SelectReplacementTarget);
}

#[tokio::test]
async fn test_dpo_target_loaded_from_provider() {
    let decision = evaluator(provider()).evaluate(2).await.unwrap();
    assert_eq!(decision.actions[0].kind, ActionKind::BuyDpoSeats);
    assert!(decision.actions[0].enabled);
}

#[tokio::test]
async fn test_bundle_includes_buyer_entry() {
    let bundle = evaluator(provider()).load_bundle(4).await.unwrap();
    let (_, buyer) = match bundle.target {
        Some(dpo_engine::TargetSnapshot::TravelCabin { cabin, buyer, .. }) => (cabin, buyer),
        other => panic!("unexpected target {:?}", other),
    };
    assert_eq!(buyer.unwrap().buyer, Buyer::Dpo(4));
}

#[tokio::test]
async fn test_running_cabin_holder_withdraws_yield() {
    let decision = evaluator(provider()).evaluate(4).await.unwrap();
    assert_eq!(decision.phase, Phase::Running);
    assert_eq!(decision.actions[0].kind, ActionKind::WithdrawYieldFromCabin);
    assert_eq!(decision.actions[0].status, ActionStatus::Ready);
}

#[tokio::test]
async fn test_nonexistent_target_is_unavailable_not_pending() {
    let decision = evaluator(provider()).evaluate(5).await.unwrap();
    assert_eq!(decision.actions[0].kind, ActionKind::SelectReplacementTarget);
    assert_eq!(decision.actions[0].status, ActionStatus::Ready);
    assert!(decision.notices.contains(&Notice::TargetNotFound));
    assert!(decision.notices.contains(&Notice::TargetUnavailable));
    assert!(!decision.notices.contains(&Notice::TargetPending));
}

#[tokio::test]
async fn test_bundle_marks_nonexistent_target_missing() {
    let bundle = evaluator(provider()).load_bundle(5).await.unwrap();
    assert_eq!(
        bundle.target,
        Some(dpo_engine::TargetSnapshot::missing(Target::TravelCabin(99)))
    );
}

#[tokio::test]
async fn test_unknown_dpo() {
    let err = evaluator(provider()).evaluate(42).await.unwrap_err();
    assert!(matches!(err, EvaluationError::DpoNotFound(42)));
}

#[tokio::test]
async fn test_evaluate_many_keeps_order() {
    let results = evaluator(provider()).evaluate_many(&[4, 42, 1]).await;
    let indices: Vec<u32> = results.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![4, 42, 1]);
    assert!(results[0].1.is_ok());
    assert!(results[1].1.is_err());
    assert_eq!(results[2].1.as_ref().unwrap().dpo_index, 1);
}

// =============================================================================
// File provider
// =============================================================================

#[tokio::test]
async fn test_file_provider_matches_in_memory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("chain-state.json");
    let state: ChainState = provider().state().clone();
    std::fs::write(&path, serde_json::to_string_pretty(&state).unwrap()).unwrap();

    let file = FileSnapshotProvider::load(&path).await.unwrap();
    assert_eq!(file.dpo_indices(), vec![1, 2, 3, 4, 5]);

    let from_file = Evaluator::new(Arc::new(file), DecisionEngine::default());
    let from_memory = evaluator(provider());
    for index in [1, 2, 3, 4, 5] {
        let a = from_file.evaluate(index).await.unwrap();
        let b = from_memory.evaluate(index).await.unwrap();
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn test_file_provider_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = FileSnapshotProvider::load(temp.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Io(_)));
}

#[tokio::test]
async fn test_file_provider_malformed_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.json");
    std::fs::write(&path, r#"{"block_height": "soon"}"#).unwrap();

    let err = FileSnapshotProvider::load(&path).await.unwrap_err();
    assert!(matches!(err, ProviderError::ParseError(_)));
}
