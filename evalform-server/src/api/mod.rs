//! HTTP API handlers for the evaluation server

pub mod buildinfo;
pub mod evaluations;
pub mod export;
pub mod health;
pub mod index;
pub mod metrics;

pub use buildinfo::get_build_info;
pub use evaluations::{get_evaluation, list_evaluations, submit_evaluation};
pub use export::export_csv;
pub use health::health_routes;
pub use index::serve_index;
pub use metrics::get_evaluation_metrics;
