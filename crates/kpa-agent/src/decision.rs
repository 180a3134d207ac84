//! Decision stage seam.

use crate::broker::PositionSnapshot;
use crate::contract::ActionContract;
use kpa_core::IndicatorSnapshot;

/// Produces an action for the latest indicator snapshot.
///
/// Implementations return an already validated contract; raw model output
/// goes through [`ActionContract::validate`] first.
pub trait Decider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn decide(&self, snapshot: &IndicatorSnapshot, position: &PositionSnapshot) -> ActionContract;
}

/// Always holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldDecider;

impl Decider for HoldDecider {
    fn name(&self) -> &str {
        "hold"
    }

    fn decide(&self, _snapshot: &IndicatorSnapshot, _position: &PositionSnapshot) -> ActionContract {
        ActionContract::empty()
    }
}
