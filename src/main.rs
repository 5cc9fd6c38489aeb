use dpo_engine::{
    AppError, Decision, DecisionEngine, DpoIndex, EngineConfig, EvaluationError, Evaluator,
    FileSnapshotProvider,
};
use std::io::Write;
use std::sync::Arc;

/// `dpo-engine <chain-state.json> [dpo_index ...]`
///
/// Prints one JSON decision per line. Without indices, every DPO in the file is evaluated.
/// Exits non-zero if any requested DPO could not be evaluated.
#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), AppError> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| AppError::Usage("dpo-engine <chain-state.json> [dpo_index ...]".to_string()))?;
    let requested = args
        .map(|raw| {
            raw.parse::<DpoIndex>()
                .map_err(|_| AppError::Usage(format!("invalid DPO index {:?}", raw)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let config = EngineConfig::from_env()?;
    let provider = FileSnapshotProvider::load(&path).await?;
    let indices = if requested.is_empty() {
        provider.dpo_indices()
    } else {
        requested
    };

    let evaluator = Evaluator::new(Arc::new(provider), DecisionEngine::new(config));
    let results = evaluator.evaluate_many(&indices).await;
    emit(&results, &mut std::io::stdout().lock())
}

/// Write every successful decision as a JSON line; fail if any evaluation failed.
fn emit<W: Write>(
    results: &[(DpoIndex, Result<Decision, EvaluationError>)],
    out: &mut W,
) -> Result<(), AppError> {
    let mut failed = 0;
    for (index, result) in results {
        match result {
            Ok(decision) => writeln!(out, "{}", serde_json::to_string(decision)?)?,
            Err(e) => {
                tracing::error!(dpo = index, error = %e, "Evaluation failed");
                failed += 1;
            }
        }
    }
    out.flush()?;

    if failed > 0 {
        return Err(AppError::EvaluationsFailed(failed));
    }
    Ok(())
}
