//! Purchase-target availability.

use super::metrics::minimum_purchase;
use crate::domain::{BlockNumber, DpoRecord, DpoState, TargetSnapshot};
use serde::Serialize;

/// Tri-state availability; `Unknown` means the target snapshot has not loaded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAvailability {
    Available,
    Unavailable,
    Unknown,
}

/// Whether `dpo` can still buy into `target`.
///
/// - TravelCabin: the class still has unsold inventory.
/// - Dpo: the target is still crowdfunding, is not `dpo` itself, does not target
///   `dpo` back, and `dpo`'s deposit vault covers at least one of its seats.
pub fn is_target_available(dpo: &DpoRecord, target: &TargetSnapshot) -> bool {
    match target {
        TargetSnapshot::TravelCabin { inventory, .. } => inventory.has_stock(),
        TargetSnapshot::Dpo { dpo: target_dpo } => {
            target_dpo.state == DpoState::Created
                && target_dpo.index != dpo.index
                && !target_dpo.target.points_at_dpo(dpo.index)
                && dpo.vault_deposit >= minimum_purchase(target_dpo)
        }
        TargetSnapshot::Missing { .. } => false,
    }
}

/// Whether `candidate` may replace `dpo`'s current target at `current_block`.
pub fn is_valid_new_target(
    dpo: &DpoRecord,
    candidate: &TargetSnapshot,
    current_block: BlockNumber,
) -> bool {
    !candidate.matches(&dpo.target) && is_purchasable_at(dpo, candidate, current_block)
}

/// A target DPO still `Created` past its expiry block with seats open can no longer sell.
fn is_expired_crowdfunding(target: &TargetSnapshot, current_block: BlockNumber) -> bool {
    match target {
        TargetSnapshot::Dpo { dpo: target_dpo } => {
            target_dpo.state == DpoState::Created
                && !target_dpo.is_fully_subscribed()
                && target_dpo.expiry_blk < current_block
        }
        _ => false,
    }
}

fn is_purchasable_at(dpo: &DpoRecord, target: &TargetSnapshot, current_block: BlockNumber) -> bool {
    !is_expired_crowdfunding(target, current_block) && is_target_available(dpo, target)
}

/// Availability of the declared target at `current_block`.
///
/// Uses the same rules as [`is_valid_new_target`], so an expired target DPO resolves as unavailable.
pub fn resolve(
    dpo: &DpoRecord,
    target: Option<&TargetSnapshot>,
    current_block: BlockNumber,
) -> TargetAvailability {
    let Some(target) = target else {
        return TargetAvailability::Unknown;
    };

    if is_purchasable_at(dpo, target, current_block) {
        TargetAvailability::Available
    } else {
        TargetAvailability::Unavailable
    }
}
