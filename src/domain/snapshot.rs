//! Snapshot bundles: everything the engine reads for one DPO at one block height.

use crate::domain::{
    BlockNumber, DpoRecord, Target, TravelCabinBuyerRecord, TravelCabinInventory,
    TravelCabinRecord,
};
use serde::{Deserialize, Serialize};

/// Caller-supplied view of a DPO's purchase target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetSnapshot {
    TravelCabin {
        cabin: TravelCabinRecord,
        inventory: TravelCabinInventory,
        /// The purchased cabin's buyer entry, once the DPO has bought it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        buyer: Option<TravelCabinBuyerRecord>,
    },
    Dpo {
        dpo: Box<DpoRecord>,
    },
    /// The declared target has no record at the snapshot height.
    Missing { target: Target },
}

impl TargetSnapshot {
    pub fn travel_cabin(
        cabin: TravelCabinRecord,
        inventory: TravelCabinInventory,
        buyer: Option<TravelCabinBuyerRecord>,
    ) -> Self {
        TargetSnapshot::TravelCabin {
            cabin,
            inventory,
            buyer,
        }
    }

    pub fn dpo(dpo: DpoRecord) -> Self {
        TargetSnapshot::Dpo { dpo: Box::new(dpo) }
    }

    pub fn missing(target: Target) -> Self {
        TargetSnapshot::Missing { target }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, TargetSnapshot::Missing { .. })
    }

    /// True when this snapshot describes the given declared target.
    pub fn matches(&self, target: &Target) -> bool {
        match (self, target) {
            (TargetSnapshot::TravelCabin { cabin, .. }, Target::TravelCabin(index)) => {
                cabin.index == *index
            }
            (TargetSnapshot::Dpo { dpo }, Target::Dpo(index, _)) => dpo.index == *index,
            (TargetSnapshot::Missing { target: missing }, declared) => missing == declared,
            _ => false,
        }
    }

    /// The declared-target form of this snapshot.
    ///
    /// Seats requested are unknown from the snapshot alone and reported as zero.
    pub fn as_target(&self) -> Target {
        match self {
            TargetSnapshot::TravelCabin { cabin, .. } => Target::TravelCabin(cabin.index),
            TargetSnapshot::Dpo { dpo } => Target::Dpo(dpo.index, 0),
            TargetSnapshot::Missing { target } => *target,
        }
    }
}

/// A DPO and its target, all read at `block_height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotBundle {
    pub block_height: BlockNumber,
    pub dpo: DpoRecord,
    /// `None` while the target is still loading; see [`TargetSnapshot::Missing`] for absent records.
    #[serde(default)]
    pub target: Option<TargetSnapshot>,
}

impl SnapshotBundle {
    pub fn new(block_height: BlockNumber, dpo: DpoRecord, target: Option<TargetSnapshot>) -> Self {
        Self {
            block_height,
            dpo,
            target,
        }
    }
}
