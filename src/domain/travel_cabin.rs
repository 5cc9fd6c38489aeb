//! TravelCabin records: the fixed-yield instrument, its inventory and buyer entries.

use crate::domain::{AccountId, Balance, BlockNumber, DpoIndex, TokenSymbol, TravelCabinIndex};
use serde::{Deserialize, Serialize};

/// A TravelCabin class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelCabinRecord {
    pub index: TravelCabinIndex,
    pub token: TokenSymbol,
    /// Fare paid to buy one cabin.
    pub deposit_amount: Balance,
    /// Maturity in blocks.
    pub maturity: u64,
    /// Yield paid over the full maturity.
    pub yield_total: Balance,
    #[serde(default)]
    pub bonus_total: Balance,
}

/// Sold and total purchase slots for one cabin class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelCabinInventory {
    pub sold: u16,
    pub total: u16,
}

impl TravelCabinInventory {
    pub fn new(sold: u16, total: u16) -> Self {
        Self { sold, total }
    }

    pub fn has_stock(&self) -> bool {
        self.sold < self.total
    }

    pub fn remaining(&self) -> u16 {
        self.total.saturating_sub(self.sold)
    }
}

/// Who holds a purchased cabin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Buyer {
    Passenger(AccountId),
    Dpo(DpoIndex),
}

/// One purchased cabin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelCabinBuyerRecord {
    /// Slot number within the cabin class inventory.
    pub inventory_index: u16,
    pub buyer: Buyer,
    pub purchase_blk: BlockNumber,
    /// Yield already withdrawn from this cabin.
    pub yield_withdrawn: Balance,
    pub fare_withdrawn: bool,
    pub blk_of_last_withdraw: BlockNumber,
}

impl TravelCabinBuyerRecord {
    pub fn is_held_by_dpo(&self, index: DpoIndex) -> bool {
        matches!(self.buyer, Buyer::Dpo(holder) if holder == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_stock() {
        assert!(TravelCabinInventory::new(3, 10).has_stock());
        assert!(!TravelCabinInventory::new(10, 10).has_stock());
        assert_eq!(TravelCabinInventory::new(12, 10).remaining(), 0);
    }

    #[test]
    fn test_buyer_serialization() {
        let buyer = Buyer::Dpo(4);
        assert_eq!(serde_json::to_string(&buyer).unwrap(), r#"{"dpo":4}"#);

        let passenger = Buyer::Passenger(AccountId::new("5Alice".to_string()));
        assert_eq!(
            serde_json::to_string(&passenger).unwrap(),
            r#"{"passenger":"5Alice"}"#
        );
    }

    #[test]
    fn test_is_held_by_dpo() {
        let record = TravelCabinBuyerRecord {
            inventory_index: 0,
            buyer: Buyer::Dpo(4),
            purchase_blk: BlockNumber::new(10),
            yield_withdrawn: Balance::ZERO,
            fare_withdrawn: false,
            blk_of_last_withdraw: BlockNumber::new(10),
        };
        assert!(record.is_held_by_dpo(4));
        assert!(!record.is_held_by_dpo(5));
    }
}
