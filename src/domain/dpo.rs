//! DPO record as read from chain state.

use crate::domain::{AccountId, Balance, BlockNumber, DpoIndex, TokenSymbol, TravelCabinIndex};
use serde::{Deserialize, Serialize};

/// Every DPO has exactly this many seats.
pub const TOTAL_SEATS: u8 = 100;

/// Rates are stored in tenths of a percent; 1000 is 100%.
pub const MAX_RATE_TENTHS: u32 = 1000;

/// Raw on-chain lifecycle state of a DPO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DpoState {
    /// Crowdfunding: seats are still on sale.
    Created,
    /// Fully subscribed, target not yet purchased.
    Active,
    /// Target purchased, yield accruing.
    Running,
    /// Target matured, fare returned.
    Completed,
    /// Crowdfunding failed.
    Failed,
}

/// What a DPO raises funds to buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    TravelCabin(TravelCabinIndex),
    /// Another DPO, with the number of its seats this DPO wants.
    Dpo(DpoIndex, u8),
}

impl Target {
    pub fn is_travel_cabin(&self) -> bool {
        matches!(self, Target::TravelCabin(_))
    }

    /// True when this target names the given DPO.
    pub fn points_at_dpo(&self, index: DpoIndex) -> bool {
        matches!(self, Target::Dpo(target, _) if *target == index)
    }
}

/// Immutable snapshot of a DPO at one block height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpoRecord {
    pub index: DpoIndex,
    pub state: DpoState,
    pub target: Target,
    pub token: TokenSymbol,
    pub manager: AccountId,
    /// Price of one seat.
    pub amount_per_seat: Balance,
    /// Total raised when all seats are sold.
    pub target_amount: Balance,
    /// Target maturity in blocks.
    pub target_maturity: u64,
    pub target_bonus_estimate: Balance,
    pub target_yield_estimate: Balance,
    pub total_yield_received: Balance,
    pub total_bonus_received: Balance,
    pub empty_seats: u8,
    /// Manager fee, tenths of a percent.
    pub fee_bps: u32,
    /// Direct referral rate, tenths of a percent.
    pub direct_referral_rate_bps: u32,
    pub expiry_blk: BlockNumber,
    pub vault_deposit: Balance,
    pub vault_bonus: Balance,
    pub vault_yield: Balance,
    pub vault_withdraw: Balance,
    /// Block at which the last seat was sold and the DPO became Active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blk_of_dpo_filled: Option<BlockNumber>,
    /// Block of the most recent yield release to members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blk_of_last_yield: Option<BlockNumber>,
}

impl DpoRecord {
    /// Seats already sold.
    pub fn seats_filled(&self) -> u8 {
        TOTAL_SEATS.saturating_sub(self.empty_seats)
    }

    pub fn is_fully_subscribed(&self) -> bool {
        self.empty_seats == 0
    }

    /// Bonus was received and has since been fully released.
    pub fn bonus_exhausted(&self) -> bool {
        !self.total_bonus_received.is_zero() && self.vault_bonus.is_zero()
    }
}
