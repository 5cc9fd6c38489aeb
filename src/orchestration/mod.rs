pub mod evaluator;

pub use evaluator::{EvaluationError, Evaluator};
