//! Objective evaluation of facility sets.

mod evaluator;

pub use evaluator::{Evaluation, ObjectiveEvaluator};
