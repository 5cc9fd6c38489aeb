//! Grace periods for the three manager obligations.
//!
//! Deadlines are counted in blocks from a reference block. Wall-clock figures
//! are projections through `expected_block_time_secs` and exist for display only.

use crate::config::EngineConfig;
use crate::domain::{BlockNumber, DpoRecord, TravelCabinBuyerRecord};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// A deadline-bound duty of the DPO manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Obligation {
    /// Buy the target after the DPO becomes Active.
    Commitment,
    /// Release vault yield to members.
    YieldRelease,
    /// Withdraw accrued yield from the purchased TravelCabin.
    CabinWithdrawal,
}

impl Obligation {
    pub fn nickname(&self) -> &'static str {
        match self {
            Obligation::Commitment => "Life Sentence",
            Obligation::YieldRelease => "Lazy Manager",
            Obligation::CabinWithdrawal => "Treasure Hunting",
        }
    }

    /// Localization key of the tip shown next to the deadline.
    pub fn tip_key(&self) -> &'static str {
        match self {
            Obligation::Commitment => "grace.commitment.tip",
            Obligation::YieldRelease => "grace.yield_release.tip",
            Obligation::CabinWithdrawal => "grace.cabin_withdrawal.tip",
        }
    }
}

/// Escalating alert level of a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    Safe,
    Warning,
    Danger,
}

/// Remaining time split for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DurationParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationParts {
    pub fn from_secs(total: u64) -> Self {
        DurationParts {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }
}

/// Deadline state of one obligation at one block height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraceResult {
    pub obligation: Obligation,
    pub tip_key: String,
    pub reference_block: BlockNumber,
    pub deadline_block: BlockNumber,
    /// Signed; zero or below means the deadline has passed.
    pub blocks_remaining: i64,
    /// `blocks_remaining` clamped at zero.
    pub display_blocks: u64,
    pub remaining: DurationParts,
    pub alert: Alert,
    #[serde(skip)]
    block_time_secs: u64,
}

impl GraceResult {
    pub fn is_overdue(&self) -> bool {
        self.alert == Alert::Danger
    }

    /// Remaining time, clamped at zero.
    pub fn remaining_duration(&self) -> TimeDelta {
        let secs = self.display_blocks.saturating_mul(self.block_time_secs);
        TimeDelta::try_seconds(i64::try_from(secs).unwrap_or(i64::MAX)).unwrap_or(TimeDelta::MAX)
    }

    /// Projected wall-clock time of the deadline block, assuming `now` is the current block.
    ///
    /// Past deadlines project into the past. `None` if the projection leaves chrono's range.
    pub fn estimated_deadline(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let secs = i128::from(self.blocks_remaining) * i128::from(self.block_time_secs);
        let delta = TimeDelta::try_seconds(i64::try_from(secs).ok()?)?;
        now.checked_add_signed(delta)
    }
}

/// Computes obligation deadlines from an [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct GracePeriodCalculator {
    commit_grace_blocks: u64,
    release_grace_blocks: u64,
    cabin_withdraw_grace_blocks: u64,
    block_time_secs: u64,
    warning_window_secs: u64,
}

impl GracePeriodCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            commit_grace_blocks: config.commit_grace_blocks,
            release_grace_blocks: config.release_grace_blocks,
            cabin_withdraw_grace_blocks: config.cabin_withdraw_grace_blocks,
            block_time_secs: config.expected_block_time_secs,
            warning_window_secs: config.warning_window_secs,
        }
    }

    pub fn grace_blocks(&self, obligation: Obligation) -> u64 {
        match obligation {
            Obligation::Commitment => self.commit_grace_blocks,
            Obligation::YieldRelease => self.release_grace_blocks,
            Obligation::CabinWithdrawal => self.cabin_withdraw_grace_blocks,
        }
    }

    /// Alert tier for a signed block remainder.
    pub fn classify(&self, blocks_remaining: i64) -> Alert {
        if blocks_remaining <= 0 {
            return Alert::Danger;
        }
        let remaining_secs = (blocks_remaining as u128) * u128::from(self.block_time_secs);
        if remaining_secs <= u128::from(self.warning_window_secs) {
            Alert::Warning
        } else {
            Alert::Safe
        }
    }

    pub fn compute(
        &self,
        obligation: Obligation,
        reference_block: BlockNumber,
        current_block: BlockNumber,
    ) -> GraceResult {
        let deadline_block = reference_block.saturating_add(self.grace_blocks(obligation));
        let blocks_remaining = deadline_block.signed_distance(current_block);
        let display_blocks = blocks_remaining.max(0) as u64;
        GraceResult {
            obligation,
            tip_key: obligation.tip_key().to_string(),
            reference_block,
            deadline_block,
            blocks_remaining,
            display_blocks,
            remaining: DurationParts::from_secs(display_blocks.saturating_mul(self.block_time_secs)),
            alert: self.classify(blocks_remaining),
            block_time_secs: self.block_time_secs,
        }
    }

    /// Deadline for buying the target, counted from activation. `None` before activation.
    pub fn commitment(&self, dpo: &DpoRecord, current_block: BlockNumber) -> Option<GraceResult> {
        dpo.blk_of_dpo_filled
            .map(|filled| self.compute(Obligation::Commitment, filled, current_block))
    }

    /// Deadline for the next yield release, counted from the last release or activation.
    pub fn yield_release(&self, dpo: &DpoRecord, current_block: BlockNumber) -> Option<GraceResult> {
        dpo.blk_of_last_yield
            .or(dpo.blk_of_dpo_filled)
            .map(|reference| self.compute(Obligation::YieldRelease, reference, current_block))
    }

    /// Deadline for withdrawing cabin yield, counted from the buyer's last withdrawal.
    pub fn cabin_withdrawal(
        &self,
        buyer: &TravelCabinBuyerRecord,
        current_block: BlockNumber,
    ) -> GraceResult {
        self.compute(
            Obligation::CabinWithdrawal,
            buyer.blk_of_last_withdraw,
            current_block,
        )
    }
}
