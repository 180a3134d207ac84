//! Kraken paper-trading agent.
//!
//! Orchestrates one cycle per pair:
//! - resolve the user pair through the symbol registry
//! - fetch OHLC candles
//! - compute the indicator snapshot
//! - ask the decider for an action contract
//! - pass it through the risk gate
//! - record the intent with the paper broker

pub mod app;
pub mod broker;
pub mod config;
pub mod contract;
pub mod decision;
pub mod error;
pub mod risk;

pub use app::{Application, CycleReport, Pipeline, RunOptions};
pub use broker::{PaperBroker, PaperFill, PositionSide, PositionSnapshot};
pub use config::AppConfig;
pub use contract::{Action, ActionContract};
pub use decision::{Decider, HoldDecider};
pub use error::{AppError, AppResult};
pub use risk::RiskGate;
