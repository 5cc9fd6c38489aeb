pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::EngineConfig;
pub use datasource::{
    ChainState, FileSnapshotProvider, InMemorySnapshotProvider, ProviderError, SnapshotProvider,
};
pub use domain::{
    AccountId, Balance, BlockNumber, Buyer, Decimal, DpoIndex, DpoRecord, DpoState,
    SnapshotBundle, Target, TargetSnapshot, TokenSymbol, TravelCabinBuyerRecord,
    TravelCabinIndex, TravelCabinInventory, TravelCabinRecord,
};
pub use engine::{Decision, DecisionEngine, Phase};
pub use error::AppError;
pub use orchestration::{EvaluationError, Evaluator};
