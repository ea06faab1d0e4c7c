//! Compatibility percentage.
//!
//! The percentage rewards alignment with the resolved archetype: the
//! archetype's achieved score is compared with the best score the active
//! question set could have produced for it, mapped onto [base, base+span],
//! nudged by cosmetic noise and clamped to [floor, ceiling].

use crate::{
    archetype::Archetype,
    catalog::Question,
    config::CompatibilityConfig,
    rng::Jitter,
    score::ScoreVector,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound accepted from any source, computed or decoded.
pub const MAX_TENTHS: u16 = 999;

/// A percentage with exactly one decimal digit, stored in tenths.
/// Renders as "98.7".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Compatibility(u16);

impl Compatibility {
    /// Round to one decimal after clamping into [0, 99.9].
    /// Non-finite input yields None.
    pub fn from_percent(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let clamped = value.clamp(0.0, MAX_TENTHS as f64 / 10.0);
        Some(Self(round_to_tenths(clamped).min(MAX_TENTHS)))
    }

    pub fn from_tenths(tenths: u16) -> Self {
        Self(tenths.min(MAX_TENTHS))
    }

    pub fn tenths(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCompatibility(pub String);

impl fmt::Display for InvalidCompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a finite number", self.0)
    }
}

impl std::error::Error for InvalidCompatibility {}

impl FromStr for Compatibility {
    type Err = InvalidCompatibility;

    /// Lenient: reads the longest numeric prefix ("98.7%" is 98.7), then
    /// clamps. Only input with no finite numeric prefix is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        leading_number(s)
            .and_then(Self::from_percent)
            .ok_or_else(|| InvalidCompatibility(s.to_string()))
    }
}

impl From<Compatibility> for String {
    fn from(value: Compatibility) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Compatibility {
    type Error = InvalidCompatibility;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Round a non-negative value to tenths from its exact binary value:
/// 1.45 is stored as 1.4499... and becomes 14. Exact halves round up.
fn round_to_tenths(value: f64) -> u16 {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        return (value * 10.0).ceil() as u16;
    }
    format!("{value:.1}")
        .replace('.', "")
        .parse()
        .unwrap_or_else(|_| (value * 10.0).round() as u16)
}

/// Parse the longest prefix of `s` (after leading whitespace) that forms a
/// decimal number: sign, digits, optional fraction, optional exponent.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when it has at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Best achievable score for `archetype` if every answer had favored it.
/// Negative weights never lower the ceiling.
pub fn max_possible(questions: &[Question], archetype: Archetype) -> f64 {
    questions
        .iter()
        .map(|q| {
            let left = q.left.weights.get(archetype);
            let right = q.right.weights.get(archetype);
            0f64.max(left).max(right)
        })
        .sum()
}

/// Achieved score over the ceiling, clamped to [0, 1].
pub fn alignment_ratio(
    scores: &ScoreVector,
    archetype: Archetype,
    questions: &[Question],
    config: &CompatibilityConfig,
) -> f64 {
    let ceiling = max_possible(questions, archetype);
    if ceiling <= 0.0 {
        return config.neutral_ratio;
    }
    (scores.get(archetype) / ceiling).clamp(0.0, 1.0)
}

/// The noise-free percentage for a given ratio.
pub fn base_percent(ratio: f64, config: &CompatibilityConfig) -> f64 {
    config.base + ratio * config.span
}

/// Final percentage: base plus cosmetic fuzz, clamped to [floor, ceiling]
/// and rounded to one decimal.
pub fn compute(
    scores: &ScoreVector,
    archetype: Archetype,
    questions: &[Question],
    config: &CompatibilityConfig,
    jitter: &mut dyn Jitter,
) -> Compatibility {
    let ratio = alignment_ratio(scores, archetype, questions, config);
    let base = base_percent(ratio, config);
    let fuzz = jitter.uniform(-config.fuzz, config.fuzz);
    let value = (base + fuzz).clamp(config.floor, config.ceiling);

    log::debug!(
        "compatibility: archetype={archetype} ratio={ratio:.3} base={base:.2} fuzz={fuzz:+.2} -> {value:.1}"
    );

    // `value` is finite and within range here.
    Compatibility::from_percent(value)
        .unwrap_or_else(|| Compatibility::from_tenths((config.floor * 10.0) as u16))
}
