//! In-memory snapshot provider, used by tests and as the backing store of the file provider.

use super::{ProviderError, SnapshotProvider};
use crate::domain::{
    BlockNumber, DpoIndex, DpoRecord, TravelCabinBuyerRecord, TravelCabinIndex,
    TravelCabinInventory, TravelCabinRecord,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A cabin class with its inventory and buyers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CabinEntry {
    pub cabin: TravelCabinRecord,
    pub inventory: TravelCabinInventory,
    #[serde(default)]
    pub buyers: Vec<TravelCabinBuyerRecord>,
}

/// Chain state frozen at one block height.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainState {
    pub block_height: BlockNumber,
    #[serde(default)]
    pub dpos: Vec<DpoRecord>,
    #[serde(default)]
    pub travel_cabins: Vec<CabinEntry>,
}

/// Snapshot provider serving a fixed [`ChainState`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotProvider {
    state: ChainState,
}

impl InMemorySnapshotProvider {
    /// Create an empty provider at height zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: ChainState) -> Self {
        Self { state }
    }

    pub fn at_height(mut self, height: u64) -> Self {
        self.state.block_height = BlockNumber::new(height);
        self
    }

    pub fn with_dpo(mut self, dpo: DpoRecord) -> Self {
        self.state.dpos.push(dpo);
        self
    }

    pub fn with_cabin(mut self, cabin: TravelCabinRecord, inventory: TravelCabinInventory) -> Self {
        self.state.travel_cabins.push(CabinEntry {
            cabin,
            inventory,
            buyers: Vec::new(),
        });
        self
    }

    /// Attach a buyer entry to an already-added cabin class; ignored if the class is unknown.
    pub fn with_buyer(mut self, cabin_index: TravelCabinIndex, buyer: TravelCabinBuyerRecord) -> Self {
        if let Some(entry) = self
            .state
            .travel_cabins
            .iter_mut()
            .find(|e| e.cabin.index == cabin_index)
        {
            entry.buyers.push(buyer);
        }
        self
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    /// Indices of all DPOs held, in insertion order.
    pub fn dpo_indices(&self) -> Vec<DpoIndex> {
        self.state.dpos.iter().map(|d| d.index).collect()
    }

    fn check_height(&self, at: BlockNumber) -> Result<(), ProviderError> {
        if at == self.state.block_height {
            Ok(())
        } else {
            Err(ProviderError::HeightMismatch {
                requested: at,
                available: self.state.block_height,
            })
        }
    }

    fn cabin_entry(&self, index: TravelCabinIndex) -> Option<&CabinEntry> {
        self.state.travel_cabins.iter().find(|e| e.cabin.index == index)
    }
}

#[async_trait]
impl SnapshotProvider for InMemorySnapshotProvider {
    async fn block_height(&self) -> Result<BlockNumber, ProviderError> {
        Ok(self.state.block_height)
    }

    async fn dpo(
        &self,
        index: DpoIndex,
        at: BlockNumber,
    ) -> Result<Option<DpoRecord>, ProviderError> {
        self.check_height(at)?;
        Ok(self.state.dpos.iter().find(|d| d.index == index).cloned())
    }

    async fn travel_cabin(
        &self,
        index: TravelCabinIndex,
        at: BlockNumber,
    ) -> Result<Option<TravelCabinRecord>, ProviderError> {
        self.check_height(at)?;
        Ok(self.cabin_entry(index).map(|e| e.cabin.clone()))
    }

    async fn travel_cabin_inventory(
        &self,
        index: TravelCabinIndex,
        at: BlockNumber,
    ) -> Result<Option<TravelCabinInventory>, ProviderError> {
        self.check_height(at)?;
        Ok(self.cabin_entry(index).map(|e| e.inventory))
    }

    async fn travel_cabin_buyer(
        &self,
        index: TravelCabinIndex,
        dpo: DpoIndex,
        at: BlockNumber,
    ) -> Result<Option<TravelCabinBuyerRecord>, ProviderError> {
        self.check_height(at)?;
        Ok(self
            .cabin_entry(index)
            .and_then(|e| e.buyers.iter().find(|b| b.is_held_by_dpo(dpo)))
            .cloned())
    }
}
