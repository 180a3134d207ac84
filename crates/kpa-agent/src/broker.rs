//! Paper broker: records trade intents against an in-memory position.
//!
//! No order ever leaves the process and no PnL is computed. A fill is the
//! record of what would have been submitted.

use crate::contract::{Action, ActionContract};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Position side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    #[default]
    Flat,
    Long,
    Short,
}

/// Current paper position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub side: PositionSide,
    pub size: f64,
    pub entry_price: Option<f64>,
    pub stop: Option<f64>,
    pub take_profit: Option<f64>,
}

impl PositionSnapshot {
    pub fn is_flat(&self) -> bool {
        self.side == PositionSide::Flat
    }
}

/// Recorded paper fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperFill {
    pub id: Uuid,
    pub filled: bool,
    pub action: Action,
    pub size_fraction: f64,
    pub price: f64,
    pub fee_bps: f64,
    pub stop: Option<f64>,
    pub take_profit: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// In-memory paper broker.
#[derive(Debug, Clone)]
pub struct PaperBroker {
    fee_bps: f64,
    position: PositionSnapshot,
    fills: Vec<PaperFill>,
}

impl PaperBroker {
    pub fn new(fee_bps: f64) -> Self {
        Self {
            fee_bps,
            position: PositionSnapshot::default(),
            fills: Vec::new(),
        }
    }

    pub fn fee_bps(&self) -> f64 {
        self.fee_bps
    }

    pub fn position(&self) -> &PositionSnapshot {
        &self.position
    }

    /// Fills recorded since start, oldest first.
    pub fn fills(&self) -> &[PaperFill] {
        &self.fills
    }

    /// Record `contract` at `price`. Always fills.
    pub fn submit(&mut self, contract: &ActionContract, price: f64) -> PaperFill {
        let fill = PaperFill {
            id: Uuid::new_v4(),
            filled: true,
            action: contract.action,
            size_fraction: contract.size_fraction,
            price,
            fee_bps: self.fee_bps,
            stop: contract.stop,
            take_profit: contract.take_profit,
            timestamp: Utc::now(),
        };

        info!(
            fill_id = %fill.id,
            action = %fill.action,
            size_fraction = fill.size_fraction,
            price = fill.price,
            fee_bps = fill.fee_bps,
            "Paper fill recorded"
        );

        self.fills.push(fill.clone());
        fill
    }
}
