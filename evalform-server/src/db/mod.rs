//! Database access layer for the evaluation server

mod evaluations;

pub use evaluations::EvaluationStore;
