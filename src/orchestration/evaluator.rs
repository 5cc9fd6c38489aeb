use crate::datasource::{ProviderError, SnapshotProvider};
use crate::domain::{BlockNumber, DpoIndex, DpoRecord, SnapshotBundle, Target, TargetSnapshot};
use crate::engine::{Decision, DecisionEngine};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;

/// Fetches consistent snapshot bundles and runs the engine on them.
#[derive(Clone)]
pub struct Evaluator {
    provider: Arc<dyn SnapshotProvider>,
    engine: DecisionEngine,
}

impl Evaluator {
    pub fn new(provider: Arc<dyn SnapshotProvider>, engine: DecisionEngine) -> Self {
        Self { provider, engine }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Read the DPO and its target at the provider's current height.
    ///
    /// All reads come from one height, so a target without records does not exist there
    /// and is bundled as [`TargetSnapshot::Missing`].
    pub async fn load_bundle(&self, index: DpoIndex) -> Result<SnapshotBundle, EvaluationError> {
        let at = self.provider.block_height().await?;
        let dpo = self
            .provider
            .dpo(index, at)
            .await?
            .ok_or(EvaluationError::DpoNotFound(index))?;

        let target = self
            .load_target(&dpo, at)
            .await?
            .unwrap_or_else(|| {
                tracing::warn!(dpo = index, block = at.as_u64(), declared_target = ?dpo.target, "Target record not found");
                TargetSnapshot::missing(dpo.target)
            });

        Ok(SnapshotBundle::new(at, dpo, Some(target)))
    }

    async fn load_target(
        &self,
        dpo: &DpoRecord,
        at: BlockNumber,
    ) -> Result<Option<TargetSnapshot>, ProviderError> {
        match dpo.target {
            Target::TravelCabin(cabin_index) => {
                let (cabin, inventory, buyer) = futures::try_join!(
                    self.provider.travel_cabin(cabin_index, at),
                    self.provider.travel_cabin_inventory(cabin_index, at),
                    self.provider.travel_cabin_buyer(cabin_index, dpo.index, at),
                )?;
                Ok(match (cabin, inventory) {
                    (Some(cabin), Some(inventory)) => {
                        Some(TargetSnapshot::travel_cabin(cabin, inventory, buyer))
                    }
                    _ => None,
                })
            }
            Target::Dpo(target_index, _) => Ok(self
                .provider
                .dpo(target_index, at)
                .await?
                .map(TargetSnapshot::dpo)),
        }
    }

    pub async fn evaluate(&self, index: DpoIndex) -> Result<Decision, EvaluationError> {
        let bundle = self.load_bundle(index).await?;
        let decision = self.engine.decide(&bundle);
        tracing::debug!(
            dpo = index,
            block = bundle.block_height.as_u64(),
            phase = ?decision.phase,
            actions = decision.actions.len(),
            "Evaluated DPO"
        );
        Ok(decision)
    }

    /// Evaluate several DPOs concurrently. Results keep the order of `indices`.
    pub async fn evaluate_many(
        &self,
        indices: &[DpoIndex],
    ) -> Vec<(DpoIndex, Result<Decision, EvaluationError>)> {
        let results = join_all(indices.iter().map(|&index| self.evaluate(index))).await;
        indices.iter().copied().zip(results).collect()
    }
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("DPO {0} not found")]
    DpoNotFound(DpoIndex),
}
