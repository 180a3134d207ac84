//! Action contract exchanged with the decision stage.
//!
//! The decider's raw output is untrusted JSON. `ActionContract::validate`
//! coerces it into a well-formed contract instead of rejecting it: unknown
//! actions become `hold`, numbers are parsed leniently and clamped to [0, 1].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Reason attached when the raw contract carries none.
const DEFAULT_REASON: &str = "placeholder";

/// Reason of the initial empty contract.
const EMPTY_REASON: &str = "initial placeholder";

/// Trading action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    EnterLong,
    ExitLong,
    EnterShort,
    ExitShort,
    #[default]
    Hold,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::EnterLong,
        Action::ExitLong,
        Action::EnterShort,
        Action::ExitShort,
        Action::Hold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnterLong => "enter_long",
            Self::ExitLong => "exit_long",
            Self::EnterShort => "enter_short",
            Self::ExitShort => "exit_short",
            Self::Hold => "hold",
        }
    }

    /// Parse an exact action name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }

    pub fn is_hold(&self) -> bool {
        *self == Self::Hold
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionContract {
    pub action: Action,
    /// Fraction of available size to use, in [0, 1].
    pub size_fraction: f64,
    pub stop: Option<f64>,
    pub take_profit: Option<f64>,
    /// Decider confidence, in [0, 1].
    pub confidence: f64,
    pub reason: String,
}

impl Default for ActionContract {
    fn default() -> Self {
        Self::empty()
    }
}

impl ActionContract {
    /// Hold contract with zero size and confidence.
    pub fn empty() -> Self {
        Self {
            action: Action::Hold,
            size_fraction: 0.0,
            stop: None,
            take_profit: None,
            confidence: 0.0,
            reason: EMPTY_REASON.to_string(),
        }
    }

    /// Coerce raw decider output into a contract.
    ///
    /// A non-object yields [`empty`](Self::empty). Fields are read
    /// independently; none of them can make validation fail.
    pub fn validate(raw: &Value) -> Self {
        let Some(object) = raw.as_object() else {
            return Self::empty();
        };

        let action = object
            .get("action")
            .and_then(Value::as_str)
            .and_then(Action::from_name)
            .unwrap_or_default();

        let reason = match object.get("reason") {
            None | Some(Value::Null) => DEFAULT_REASON.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        Self {
            action,
            size_fraction: unit_fraction(object.get("size_fraction")),
            stop: lenient_number(object.get("stop")),
            take_profit: lenient_number(object.get("take_profit")),
            confidence: unit_fraction(object.get("confidence")),
            reason,
        }
    }
}

/// Number or numeric string; anything else is `None`.
fn lenient_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    (!n.is_nan()).then_some(n)
}

/// Lenient number clamped to [0, 1]; unparsable values become 0.
fn unit_fraction(value: Option<&Value>) -> f64 {
    lenient_number(value).unwrap_or(0.0).clamp(0.0, 1.0)
}
