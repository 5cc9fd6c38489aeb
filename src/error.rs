use crate::config::ConfigError;
use crate::datasource::ProviderError;
use crate::orchestration::EvaluationError;
use thiserror::Error;

/// Top-level error of the command-line entry point.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Snapshot provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
    #[error("{0} DPO evaluation(s) failed")]
    EvaluationsFailed(usize),
    #[error("Usage: {0}")]
    Usage(String),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Usage(_) => 2,
            AppError::Config(_) => 78,
            _ => 1,
        }
    }
}
