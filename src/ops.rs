//! Fuzzy operators an inference node applies to its resolved inputs.
//!
//! Degrees are not clamped: inputs outside [0.0, 1.0] produce outputs outside it.

use core::fmt;
use core::str::FromStr;

/// Operator combining the degrees of an inference node's inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// `min(left, right)`
    #[default]
    And,
    /// `max(left, right)`
    Or,
    /// `1 - left`
    Not,
    /// `left`, unchanged. The right input is ignored.
    Passthrough,
}

impl Operator {
    /// All operators, in display order.
    pub const ALL: [Operator; 4] = [Self::And, Self::Or, Self::Not, Self::Passthrough];

    /// Whether the right input takes part in evaluation.
    pub fn uses_right(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Combine resolved degrees. `right` is ignored unless [`uses_right`](Self::uses_right).
    pub fn call(self, left: f32, right: f32) -> f32 {
        match self {
            Self::And => f32::min(left, right),
            Self::Or => f32::max(left, right),
            Self::Not => 1.0 - left,
            Self::Passthrough => left,
        }
    }

    /// Stable name used in labels and bindings.
    pub fn name(self) -> &'static str {
        match self {
            Self::And => "And",
            Self::Or => "Or",
            Self::Not => "Not",
            Self::Passthrough => "Passthrough",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown operator name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownOperator;

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown operator (expected And, Or, Not or Passthrough)")
    }
}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownOperator)
    }
}
