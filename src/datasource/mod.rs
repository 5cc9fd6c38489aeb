//! Snapshot provider abstraction: where chain state comes from.
//!
//! The engine never reads chain state itself; callers fetch a consistent
//! bundle through a [`SnapshotProvider`] and hand it over.

use crate::domain::{
    BlockNumber, DpoIndex, DpoRecord, TravelCabinBuyerRecord, TravelCabinIndex,
    TravelCabinInventory, TravelCabinRecord,
};
use async_trait::async_trait;
use std::fmt;

pub mod file;
pub mod memory;

pub use file::FileSnapshotProvider;
pub use memory::{ChainState, InMemorySnapshotProvider};

/// Read-only access to chain state at a given height.
///
/// Implementations must answer every call of one evaluation from the same height.
#[async_trait]
pub trait SnapshotProvider: Send + Sync + fmt::Debug {
    /// Current best block height.
    async fn block_height(&self) -> Result<BlockNumber, ProviderError>;

    /// DPO record, or `None` if the index does not exist.
    async fn dpo(
        &self,
        index: DpoIndex,
        at: BlockNumber,
    ) -> Result<Option<DpoRecord>, ProviderError>;

    async fn travel_cabin(
        &self,
        index: TravelCabinIndex,
        at: BlockNumber,
    ) -> Result<Option<TravelCabinRecord>, ProviderError>;

    async fn travel_cabin_inventory(
        &self,
        index: TravelCabinIndex,
        at: BlockNumber,
    ) -> Result<Option<TravelCabinInventory>, ProviderError>;

    /// Buyer entry of the cabin slot held by `dpo`, if it bought one.
    async fn travel_cabin_buyer(
        &self,
        index: TravelCabinIndex,
        dpo: DpoIndex,
        at: BlockNumber,
    ) -> Result<Option<TravelCabinBuyerRecord>, ProviderError>;
}

/// Error type for snapshot provider operations.
#[derive(Debug, Clone)]
pub enum ProviderError {
    /// Reading the backing store failed.
    Io(String),
    /// The backing store held malformed data.
    ParseError(String),
    /// A height other than the provider's own was requested.
    HeightMismatch {
        requested: BlockNumber,
        available: BlockNumber,
    },
    /// Other error
    Other(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Io(msg) => write!(f, "I/O error: {}", msg),
            ProviderError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ProviderError::HeightMismatch {
                requested,
                available,
            } => write!(
                f,
                "Snapshot at {} requested, provider holds {}",
                requested, available
            ),
            ProviderError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}
