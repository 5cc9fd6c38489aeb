//! Pure derivation engine: snapshot in, decision out.
//!
//! Nothing in here performs I/O, holds shared state or mutates its inputs, so
//! the same `(snapshot, block_height)` always yields the same [`Decision`].

use crate::config::EngineConfig;
use crate::domain::{BlockNumber, DpoIndex, DpoRecord, SnapshotBundle, TargetSnapshot};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub mod actions;
pub mod grace;
pub mod lifecycle;
pub mod metrics;
pub mod target;

pub use actions::{
    Action, ActionContext, ActionDeriver, ActionKind, ActionStatus, CallArg, CallDescriptor,
    Caller, FormInput,
};
pub use grace::{Alert, DurationParts, GracePeriodCalculator, GraceResult, Obligation};
pub use lifecycle::{InvalidSnapshot, Phase};
pub use metrics::Metrics;
pub use target::{is_target_available, is_valid_new_target, TargetAvailability};

/// Conditions the presentation layer should surface alongside the actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// The snapshot was refused; see `reason`.
    InvalidSnapshot { reason: String },
    /// The target snapshot has not loaded; dependent actions are pending.
    TargetPending,
    /// The declared target can no longer be bought.
    TargetUnavailable,
    /// The declared target has no record at this block height.
    TargetNotFound,
    /// A manager deadline has passed.
    ObligationOverdue { obligation: Obligation },
}

/// Everything derived for one DPO at one block height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub dpo_index: DpoIndex,
    pub block_height: BlockNumber,
    pub phase: Phase,
    pub actions: Vec<Action>,
    /// Absent when the snapshot is indeterminate.
    pub metrics: Option<Metrics>,
    pub notices: Vec<Notice>,
}

impl Decision {
    /// Hex SHA-256 of the canonical JSON encoding.
    ///
    /// Equal for equal inputs; callers may use it to detect that a re-evaluation changed nothing.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// First action of the given kind.
    pub fn action(&self, kind: ActionKind) -> Option<&Action> {
        self.actions.iter().find(|a| a.kind == kind)
    }
}

/// Orchestrates target resolution, grace periods, metrics and action derivation.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: EngineConfig,
    grace: GracePeriodCalculator,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let grace = GracePeriodCalculator::new(&config);
        Self { config, grace }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grace(&self) -> &GracePeriodCalculator {
        &self.grace
    }

    pub fn decide(&self, bundle: &SnapshotBundle) -> Decision {
        self.decide_parts(&bundle.dpo, bundle.target.as_ref(), bundle.block_height)
    }

    pub fn decide_parts(
        &self,
        dpo: &DpoRecord,
        target: Option<&TargetSnapshot>,
        current_block: BlockNumber,
    ) -> Decision {
        if let Err(reason) = lifecycle::validate(dpo, target) {
            return Decision {
                dpo_index: dpo.index,
                block_height: current_block,
                phase: Phase::Indeterminate,
                actions: Vec::new(),
                metrics: None,
                notices: vec![Notice::InvalidSnapshot {
                    reason: reason.to_string(),
                }],
            };
        }

        let phase = lifecycle::classify(dpo, current_block);
        let availability = target::resolve(dpo, target, current_block);
        let ctx = ActionContext {
            dpo,
            target,
            availability,
            phase,
            current_block,
        };
        let actions = ActionDeriver::new(ctx, &self.grace).derive();

        let mut notices = Vec::new();
        if actions.iter().any(|a| a.status == ActionStatus::Pending) {
            notices.push(Notice::TargetPending);
        }
        if phase == Phase::Active && availability == TargetAvailability::Unavailable {
            notices.push(Notice::TargetUnavailable);
        }
        if target.is_some_and(TargetSnapshot::is_missing) {
            notices.push(Notice::TargetNotFound);
        }
        // Nothing is owed once an action has nothing left to move.
        notices.extend(
            actions
                .iter()
                .filter(|a| a.status == ActionStatus::Ready)
                .filter_map(|a| a.grace_period.as_ref())
                .filter(|g| g.is_overdue())
                .map(|g| Notice::ObligationOverdue {
                    obligation: g.obligation,
                }),
        );

        let cabin = match target {
            Some(TargetSnapshot::TravelCabin {
                cabin,
                buyer: Some(buyer),
                ..
            }) => Some((cabin, buyer)),
            _ => None,
        };
        let metrics = Metrics::compute(dpo, cabin, current_block, &self.config);

        Decision {
            dpo_index: dpo.index,
            block_height: current_block,
            phase,
            actions,
            metrics: Some(metrics),
            notices,
        }
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
