//! Candle timeframes supported by the OHLC endpoint.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Duration of one candle bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
}

impl Timeframe {
    pub const ALL: [Self; 5] = [Self::M1, Self::M5, Self::M15, Self::H1, Self::H4];

    /// Interval in minutes, as expected by the exchange `interval` parameter.
    pub fn interval_minutes(&self) -> u32 {
        match self {
            Self::M1 => 1,
            Self::M5 => 5,
            Self::M15 => 15,
            Self::H1 => 60,
            Self::H4 => 240,
        }
    }

    /// Canonical label ("1m", "5m", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::H1 => "1h",
            Self::H4 => "4h",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tf| tf.as_str() == label)
            .ok_or_else(|| CoreError::UnsupportedTimeframe(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_minutes() {
        assert_eq!(Timeframe::M1.interval_minutes(), 1);
        assert_eq!(Timeframe::M5.interval_minutes(), 5);
        assert_eq!(Timeframe::M15.interval_minutes(), 15);
        assert_eq!(Timeframe::H1.interval_minutes(), 60);
        assert_eq!(Timeframe::H4.interval_minutes(), 240);
    }

    #[test]
    fn test_parse_labels() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), tf);
        }
        assert_eq!(" 1H ".parse::<Timeframe>().unwrap(), Timeframe::H1);
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "1d".parse::<Timeframe>().unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedTimeframe(ref s) if s == "1d"));
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Timeframe::M15).unwrap();
        assert_eq!(json, r#""15m""#);
        let tf: Timeframe = serde_json::from_str(r#""4h""#).unwrap();
        assert_eq!(tf, Timeframe::H4);
    }
}
