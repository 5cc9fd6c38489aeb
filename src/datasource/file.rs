//! Snapshot provider backed by a JSON chain-state file.

use super::{ChainState, InMemorySnapshotProvider, ProviderError, SnapshotProvider};
use crate::domain::{
    BlockNumber, DpoIndex, DpoRecord, TravelCabinBuyerRecord, TravelCabinIndex,
    TravelCabinInventory, TravelCabinRecord,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads a [`ChainState`] document once and serves it.
#[derive(Debug, Clone)]
pub struct FileSnapshotProvider {
    path: PathBuf,
    inner: InMemorySnapshotProvider,
}

impl FileSnapshotProvider {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref().to_path_buf();
        debug!(path = %path.display(), "Reading chain state file");

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ProviderError::Io(format!("{}: {}", path.display(), e)))?;
        let state: ChainState = serde_json::from_str(&content)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", path.display(), e)))?;

        info!(
            path = %path.display(),
            block = state.block_height.as_u64(),
            dpos = state.dpos.len(),
            travel_cabins = state.travel_cabins.len(),
            "Loaded chain state"
        );

        Ok(Self {
            path,
            inner: InMemorySnapshotProvider::from_state(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dpo_indices(&self) -> Vec<DpoIndex> {
        self.inner.dpo_indices()
    }
}

#[async_trait]
impl SnapshotProvider for FileSnapshotProvider {
    async fn block_height(&self) -> Result<BlockNumber, ProviderError> {
        self.inner.block_height().await
    }

    async fn dpo(
        &self,
        index: DpoIndex,
        at: BlockNumber,
    ) -> Result<Option<DpoRecord>, ProviderError> {
        self.inner.dpo(index, at).await
    }

    async fn travel_cabin(
        &self,
        index: TravelCabinIndex,
        at: BlockNumber,
    ) -> Result<Option<TravelCabinRecord>, ProviderError> {
        self.inner.travel_cabin(index, at).await
    }

    async fn travel_cabin_inventory(
        &self,
        index: TravelCabinIndex,
        at: BlockNumber,
    ) -> Result<Option<TravelCabinInventory>, ProviderError> {
        self.inner.travel_cabin_inventory(index, at).await
    }

    async fn travel_cabin_buyer(
        &self,
        index: TravelCabinIndex,
        dpo: DpoIndex,
        at: BlockNumber,
    ) -> Result<Option<TravelCabinBuyerRecord>, ProviderError> {
        self.inner.travel_cabin_buyer(index, dpo, at).await
    }
}
