pub mod backup;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod lineup;
pub mod models;
pub mod output;
pub mod scorecard;
pub mod state;
pub mod stats;
pub mod store;
pub mod telemetry;
pub mod toss;
