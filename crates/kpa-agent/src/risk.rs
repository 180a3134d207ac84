//! Risk gate between the decider and the broker.

use crate::config::AppConfig;
use crate::contract::ActionContract;
use tracing::debug;

/// Loss-cap gate.
///
/// Currently pass-through: the caps are carried and logged but no PnL is
/// tracked yet, so nothing is downgraded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskGate {
    per_trade_loss_cap: f64,
    daily_loss_cap: f64,
}

impl RiskGate {
    pub fn new(per_trade_loss_cap: f64, daily_loss_cap: f64) -> Self {
        Self {
            per_trade_loss_cap,
            daily_loss_cap,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.per_trade_loss_cap, config.daily_loss_cap)
    }

    pub fn per_trade_loss_cap(&self) -> f64 {
        self.per_trade_loss_cap
    }

    pub fn daily_loss_cap(&self) -> f64 {
        self.daily_loss_cap
    }

    /// Gate a proposal.
    pub fn check_and_gate(&self, proposal: ActionContract) -> ActionContract {
        debug!(
            action = %proposal.action,
            size_fraction = proposal.size_fraction,
            per_trade_loss_cap = self.per_trade_loss_cap,
            daily_loss_cap = self.daily_loss_cap,
            "Risk gate passed"
        );
        proposal
    }
}

impl Default for RiskGate {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
