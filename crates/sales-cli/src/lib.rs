//! CLI library components for the sales reconciliation pipeline.

pub mod logging;
pub mod pipeline;
pub mod types;
