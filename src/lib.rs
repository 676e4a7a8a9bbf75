//! Alpha Signals
//!
//! Polls market data on a fixed schedule, derives technical indicators,
//! retrains a small decision tree every cycle to guess the next bar's direction
//! and pushes the resulting signal to a chat channel.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod ml;
pub mod models;
pub mod services;
pub mod signals;

pub use error::PipelineError;
