pub mod config;
pub mod dists;
pub mod engine;
pub mod error;
pub mod events;
pub mod export;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod output;
pub mod state;
