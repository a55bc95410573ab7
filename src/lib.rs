pub mod aggregate;
pub mod chart;
pub mod dataset;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod sample_data;
pub mod scale;
pub mod state;
pub mod tooltip;
