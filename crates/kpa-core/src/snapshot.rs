//! Indicator snapshot handed to the decision stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// EMA12/EMA26 regime label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaCross {
    /// EMA12 above EMA26.
    Bull,
    /// EMA12 below EMA26.
    Bear,
    /// EMA12 crossed above EMA26 on the latest bar.
    BullCross,
    /// EMA12 crossed below EMA26 on the latest bar.
    BearCross,
    /// EMA12 exactly equal to EMA26.
    #[serde(rename = "none")]
    Flat,
}

impl EmaCross {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bull => "bull",
            Self::Bear => "bear",
            Self::BullCross => "bull_cross",
            Self::BearCross => "bear_cross",
            Self::Flat => "none",
        }
    }

    /// True for `BullCross` and `BearCross`.
    pub fn is_fresh_cross(&self) -> bool {
        matches!(self, Self::BullCross | Self::BearCross)
    }
}

impl fmt::Display for EmaCross {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicator values for the latest bar of a candle sequence.
///
/// Every indicator is optional: `None` means the history was too short (or
/// the volume was zero, for VWAP), never that the value computed to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub ema12: Option<f64>,
    pub ema26: Option<f64>,
    pub ema_cross: Option<EmaCross>,
    pub atr: Option<f64>,
    pub vwap: Option<f64>,
    /// Last close.
    pub price: Option<f64>,
    pub timeframe: String,
}

impl IndicatorSnapshot {
    /// Snapshot carrying only price and timeframe.
    pub fn empty(price: Option<f64>, timeframe: impl Into<String>) -> Self {
        Self {
            rsi: None,
            ema12: None,
            ema26: None,
            ema_cross: None,
            atr: None,
            vwap: None,
            price,
            timeframe: timeframe.into(),
        }
    }

    /// True when no indicator field is populated.
    pub fn is_sparse(&self) -> bool {
        self.rsi.is_none()
            && self.ema12.is_none()
            && self.ema26.is_none()
            && self.ema_cross.is_none()
            && self.atr.is_none()
            && self.vwap.is_none()
    }
}
