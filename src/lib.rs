pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod extract;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod server;
