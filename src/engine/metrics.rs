//! Financial figures derived from DPO and TravelCabin snapshots.
//!
//! Every ratio goes through the integer-scaled helpers in `domain::units`;
//! a zero denominator yields `None` rather than an error.

use crate::config::EngineConfig;
use crate::domain::units::{mul_div_floor, scaled_quotient, to_display};
use crate::domain::{
    Balance, BlockNumber, Decimal, DpoRecord, TravelCabinBuyerRecord, TravelCabinRecord,
    TOTAL_SEATS,
};
use serde::Serialize;

pub const SECONDS_PER_YEAR: u128 = 365 * 24 * 60 * 60;

/// Annualized percentage yield of `total_yield` on `total_deposit` over `maturity_blocks`.
///
/// `None` when the deposit or the maturity period is zero, or the figures overflow.
pub fn apy(
    total_yield: Balance,
    total_deposit: Balance,
    maturity_blocks: u64,
    block_time_secs: u64,
    precision: u8,
) -> Option<Decimal> {
    let period_secs = u128::from(maturity_blocks).checked_mul(u128::from(block_time_secs))?;
    if total_deposit.is_zero() || period_secs == 0 {
        return None;
    }
    let denominator = total_deposit.as_u128().checked_mul(period_secs)?;
    scaled_quotient(
        total_yield.as_u128(),
        SECONDS_PER_YEAR * 100,
        denominator,
        precision,
    )
}

/// Smallest valid single purchase: one seat.
pub fn minimum_purchase(dpo: &DpoRecord) -> Balance {
    dpo.amount_per_seat
}

/// Amount still needed before the DPO is fully subscribed.
pub fn remaining_purchase(dpo: &DpoRecord) -> Balance {
    Balance::new(
        dpo.amount_per_seat
            .as_u128()
            .saturating_mul(u128::from(dpo.empty_seats)),
    )
}

/// Seat-fill progress in [0, 100].
pub fn progress_pct(dpo: &DpoRecord) -> u8 {
    TOTAL_SEATS - dpo.empty_seats.min(TOTAL_SEATS)
}

/// Estimated bonus as a percentage of the target amount.
pub fn bonus_rate_pct(dpo: &DpoRecord, precision: u8) -> Option<Decimal> {
    scaled_quotient(
        dpo.target_bonus_estimate.as_u128(),
        100,
        dpo.target_amount.as_u128(),
        precision,
    )
}

/// Tenths-of-a-percent rate as a percentage.
pub fn rate_pct(tenths: u32) -> Decimal {
    Decimal::from_scaled(u128::from(tenths), 1).unwrap_or_default()
}

/// Yield accrued on a purchased cabin and not yet withdrawn.
///
/// Accrual is linear from the purchase block over the cabin maturity.
pub fn cabin_accrued_yield(
    cabin: &TravelCabinRecord,
    buyer: &TravelCabinBuyerRecord,
    current_block: BlockNumber,
) -> Balance {
    let elapsed = current_block
        .as_u64()
        .saturating_sub(buyer.purchase_blk.as_u64())
        .min(cabin.maturity);
    let accrued = if cabin.maturity == 0 {
        cabin.yield_total.as_u128()
    } else {
        mul_div_floor(
            cabin.yield_total.as_u128(),
            u128::from(elapsed),
            u128::from(cabin.maturity),
        )
        .unwrap_or_else(|| cabin.yield_total.as_u128())
    };
    Balance::new(accrued).saturating_sub(buyer.yield_withdrawn)
}

/// True once the cabin's maturity has elapsed since purchase.
pub fn cabin_matured(
    cabin: &TravelCabinRecord,
    buyer: &TravelCabinBuyerRecord,
    current_block: BlockNumber,
) -> bool {
    current_block >= buyer.purchase_blk.saturating_add(cabin.maturity)
}

/// Presentation bundle of a DPO's figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub progress_pct: u8,
    pub seats_filled: u8,
    pub minimum_purchase: Balance,
    pub remaining_purchase: Balance,
    pub remaining_purchase_display: String,
    pub apy: Option<Decimal>,
    pub bonus_rate_pct: Option<Decimal>,
    pub fee_pct: Decimal,
    pub referral_rate_pct: Decimal,
    /// Yield withdrawable from the purchased cabin, when the target is one and it is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cabin_withdrawable_yield: Option<Balance>,
}

impl Metrics {
    pub fn compute(
        dpo: &DpoRecord,
        cabin: Option<(&TravelCabinRecord, &TravelCabinBuyerRecord)>,
        current_block: BlockNumber,
        config: &EngineConfig,
    ) -> Self {
        let remaining = remaining_purchase(dpo);
        Metrics {
            progress_pct: progress_pct(dpo),
            seats_filled: dpo.seats_filled(),
            minimum_purchase: minimum_purchase(dpo),
            remaining_purchase: remaining,
            remaining_purchase_display: to_display(
                remaining.as_u128(),
                config.token_decimals,
                config.display_precision,
            ),
            apy: apy(
                dpo.target_yield_estimate,
                dpo.target_amount,
                dpo.target_maturity,
                config.expected_block_time_secs,
                config.display_precision,
            ),
            bonus_rate_pct: bonus_rate_pct(dpo, config.display_precision),
            fee_pct: rate_pct(dpo.fee_bps),
            referral_rate_pct: rate_pct(dpo.direct_referral_rate_bps),
            cabin_withdrawable_yield: cabin
                .map(|(cabin, buyer)| cabin_accrued_yield(cabin, buyer, current_block)),
        }
    }
}
