//! Snap increments — the fixed, ordered set of beat fractions placements snap to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

const fn lcm(a: u64, b: u64) -> u64 {
    a / gcd(a, b) * b
}

/// Denominator shared by the two finest snap fractions (1/64 and 1/24).
pub const LOWEST_COMMON_DENOMINATOR: u64 = lcm(64, 24);

/// The finest beat resolution the editor distinguishes. Every snap increment
/// is an integer multiple of it.
pub const HIGHEST_PRECISION: f64 = 1.0 / LOWEST_COMMON_DENOMINATOR as f64;

/// A musically meaningful snap increment, ordered finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SnapIncrement {
    SixtyFourth,
    ThirtySecond,
    TwentyFourth,
    Sixteenth,
    Twelfth,
    Eighth,
    Sixth,
    Quarter,
    Third,
    Half,
    One,
    Two,
    Four,
    Eight,
    Sixteen,
}

impl SnapIncrement {
    /// All increments, finest first.
    pub const ALL: [SnapIncrement; 15] = [
        SnapIncrement::SixtyFourth,
        SnapIncrement::ThirtySecond,
        SnapIncrement::TwentyFourth,
        SnapIncrement::Sixteenth,
        SnapIncrement::Twelfth,
        SnapIncrement::Eighth,
        SnapIncrement::Sixth,
        SnapIncrement::Quarter,
        SnapIncrement::Third,
        SnapIncrement::Half,
        SnapIncrement::One,
        SnapIncrement::Two,
        SnapIncrement::Four,
        SnapIncrement::Eight,
        SnapIncrement::Sixteen,
    ];

    /// `(numerator, denominator)` of the increment in beats.
    pub fn ratio(self) -> (u64, u64) {
        match self {
            SnapIncrement::SixtyFourth => (1, 64),
            SnapIncrement::ThirtySecond => (1, 32),
            SnapIncrement::TwentyFourth => (1, 24),
            SnapIncrement::Sixteenth => (1, 16),
            SnapIncrement::Twelfth => (1, 12),
            SnapIncrement::Eighth => (1, 8),
            SnapIncrement::Sixth => (1, 6),
            SnapIncrement::Quarter => (1, 4),
            SnapIncrement::Third => (1, 3),
            SnapIncrement::Half => (1, 2),
            SnapIncrement::One => (1, 1),
            SnapIncrement::Two => (2, 1),
            SnapIncrement::Four => (4, 1),
            SnapIncrement::Eight => (8, 1),
            SnapIncrement::Sixteen => (16, 1),
        }
    }

    /// The increment as a beat count.
    pub fn beats(self) -> f64 {
        let (num, den) = self.ratio();
        num as f64 / den as f64
    }

    /// Display label, e.g. `"1/16"` or `"2"`.
    pub fn label(self) -> String {
        match self.ratio() {
            (num, 1) => num.to_string(),
            (num, den) => format!("{num}/{den}"),
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// Next finer increment; stays put at 1/64.
    pub fn finer(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    /// Next coarser increment; stays put at 16.
    pub fn coarser(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }
}

impl Default for SnapIncrement {
    fn default() -> Self {
        SnapIncrement::Half
    }
}

impl fmt::Display for SnapIncrement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Error returned when a label is not one of the fixed snap increments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown snap increment '{0}'")]
pub struct UnknownSnapIncrement(pub String);

impl FromStr for SnapIncrement {
    type Err = UnknownSnapIncrement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|snap| snap.label() == wanted)
            .ok_or_else(|| UnknownSnapIncrement(s.to_string()))
    }
}

impl TryFrom<String> for SnapIncrement {
    type Error = UnknownSnapIncrement;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SnapIncrement> for String {
    fn from(value: SnapIncrement) -> Self {
        value.label()
    }
}
