//! Per-asset analysis jobs

pub mod context;
pub mod handlers;
pub mod types;

pub use context::JobContext;
pub use types::AnalyzeAssetJob;
