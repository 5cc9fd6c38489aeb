//! Effective lifecycle phase and snapshot validation.

use crate::domain::{
    BlockNumber, DpoRecord, DpoState, Target, TargetSnapshot, MAX_RATE_TENTHS, TOTAL_SEATS,
};
use serde::Serialize;
use thiserror::Error;

/// Phase shown to users. Adds `Expired` and `Indeterminate` to the on-chain states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Created,
    /// Still `Created` on chain, past `expiry_blk` with seats open.
    Expired,
    Active,
    Running,
    Completed,
    Failed,
    /// Snapshot failed validation; nothing is derived from it.
    Indeterminate,
}

impl Phase {
    pub fn from_state(state: DpoState) -> Self {
        match state {
            DpoState::Created => Phase::Created,
            DpoState::Active => Phase::Active,
            DpoState::Running => Phase::Running,
            DpoState::Completed => Phase::Completed,
            DpoState::Failed => Phase::Failed,
        }
    }

    /// Phase as the presentation layer should render it; `Expired` renders as `Failed`.
    pub fn presentation(&self) -> Phase {
        match self {
            Phase::Expired => Phase::Failed,
            other => *other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed | Phase::Expired)
    }
}

/// Why a snapshot cannot be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSnapshot {
    #[error("empty_seats {0} exceeds 100")]
    EmptySeatsOutOfRange(u8),
    #[error("{field} {value} exceeds 1000 tenths of a percent")]
    RateOutOfRange { field: String, value: u32 },
    #[error("{vault} exceeds the total received")]
    VaultExceedsReceived { vault: String },
    #[error("state {0:?} requires a full DPO but {1} seats are empty")]
    OpenSeatsAfterCrowdfunding(DpoState, u8),
    #[error("state {0:?} requires the activation block")]
    MissingActivationBlock(DpoState),
    #[error("target snapshot does not describe declared target {0:?}")]
    TargetMismatch(Target),
    #[error("buyer record of cabin slot {0} is not held by this DPO")]
    BuyerMismatch(u16),
    #[error("state {0:?} requires its target {1:?} to exist")]
    MissingTargetRecord(DpoState, Target),
}

/// Check a DPO snapshot, and its target snapshot if present, for internal consistency.
pub fn validate(dpo: &DpoRecord, target: Option<&TargetSnapshot>) -> Result<(), InvalidSnapshot> {
    if dpo.empty_seats > TOTAL_SEATS {
        return Err(InvalidSnapshot::EmptySeatsOutOfRange(dpo.empty_seats));
    }
    for (field, value) in [
        ("fee_bps", dpo.fee_bps),
        ("direct_referral_rate_bps", dpo.direct_referral_rate_bps),
    ] {
        if value > MAX_RATE_TENTHS {
            return Err(InvalidSnapshot::RateOutOfRange {
                field: field.to_string(),
                value,
            });
        }
    }
    if dpo.vault_yield > dpo.total_yield_received {
        return Err(InvalidSnapshot::VaultExceedsReceived {
            vault: "vault_yield".to_string(),
        });
    }
    if dpo.vault_bonus > dpo.total_bonus_received {
        return Err(InvalidSnapshot::VaultExceedsReceived {
            vault: "vault_bonus".to_string(),
        });
    }

    match dpo.state {
        DpoState::Active | DpoState::Running | DpoState::Completed => {
            if !dpo.is_fully_subscribed() {
                return Err(InvalidSnapshot::OpenSeatsAfterCrowdfunding(
                    dpo.state,
                    dpo.empty_seats,
                ));
            }
        }
        DpoState::Created | DpoState::Failed => {}
    }
    if matches!(dpo.state, DpoState::Active | DpoState::Running) && dpo.blk_of_dpo_filled.is_none()
    {
        return Err(InvalidSnapshot::MissingActivationBlock(dpo.state));
    }

    if let Some(target) = target {
        if !target.matches(&dpo.target) {
            return Err(InvalidSnapshot::TargetMismatch(dpo.target));
        }
        if let TargetSnapshot::TravelCabin {
            buyer: Some(buyer), ..
        } = target
        {
            if !buyer.is_held_by_dpo(dpo.index) {
                return Err(InvalidSnapshot::BuyerMismatch(buyer.inventory_index));
            }
        }
        // A purchased target cannot disappear.
        if target.is_missing() && matches!(dpo.state, DpoState::Running | DpoState::Completed) {
            return Err(InvalidSnapshot::MissingTargetRecord(dpo.state, dpo.target));
        }
    }

    Ok(())
}

/// Effective phase of an already-validated snapshot at `current_block`.
pub fn classify(dpo: &DpoRecord, current_block: BlockNumber) -> Phase {
    match dpo.state {
        DpoState::Created if !dpo.is_fully_subscribed() && dpo.expiry_blk < current_block => {
            Phase::Expired
        }
        state => Phase::from_state(state),
    }
}
