//! Domain types for DPO chain state.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper and u128 Balance
//! - Exact unit conversion between minor units and display strings
//! - Domain primitives: BlockNumber, AccountId, TokenSymbol, index aliases
//! - DPO and TravelCabin records plus the snapshot bundle the engine consumes

pub mod decimal;
pub mod dpo;
pub mod primitives;
pub mod snapshot;
pub mod travel_cabin;
pub mod units;

pub use decimal::Decimal;
pub use dpo::{DpoRecord, DpoState, Target, MAX_RATE_TENTHS, TOTAL_SEATS};
pub use primitives::{AccountId, Balance, BlockNumber, DpoIndex, TokenSymbol, TravelCabinIndex};
pub use snapshot::{SnapshotBundle, TargetSnapshot};
pub use travel_cabin::{Buyer, TravelCabinBuyerRecord, TravelCabinInventory, TravelCabinRecord};
pub use units::UnitError;
