use crate::{
    error::{MatchError, MatchResult},
    types::{Millis, DEFAULT_QUESTION_COUNT},
};
use serde::{Deserialize, Serialize};

/// Compatibility percentage shaping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompatibilityConfig {
    /// Percentage awarded at ratio 0.
    pub base: f64,
    /// Added on top of `base` at ratio 1.
    pub span: f64,
    /// Cosmetic noise is drawn from [-fuzz, fuzz).
    pub fuzz: f64,
    pub floor: f64,
    pub ceiling: f64,
    /// Ratio used when the archetype could not score at all.
    pub neutral_ratio: f64,
}

impl Default for CompatibilityConfig {
    fn default() -> Self {
        Self {
            base:          72.0,
            span:          27.0,
            fuzz:          3.0,
            floor:         66.0,
            ceiling:       99.9,
            neutral_ratio: 0.5,
        }
    }
}

/// Candidate-selection hash constants, one per archetype in canonical
/// order. Changing them changes which candidate a given score vector maps
/// to; shared links are unaffected because they carry the candidate id.
pub const DEFAULT_HASH_MULTIPLIERS: [i64; 5] = [97, 101, 103, 107, 109];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub question_count:      usize,
    /// Minimum gap between two accepted answers.
    pub answer_cooldown_ms:  Millis,
    /// How long the simulating phase lasts before the result appears.
    pub simulation_delay_ms: Millis,
    /// Notification auto-dismiss.
    pub notification_ms:     Millis,
    pub hash_multipliers:    [i64; 5],
    pub compatibility:       CompatibilityConfig,
    /// Journal entries kept per session; older entries are dropped first.
    pub journal_limit:       usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            question_count:      DEFAULT_QUESTION_COUNT,
            answer_cooldown_ms:  450,
            simulation_delay_ms: 3_000,
            notification_ms:     2_400,
            hash_multipliers:    DEFAULT_HASH_MULTIPLIERS,
            compatibility:       CompatibilityConfig::default(),
            journal_limit:       10_000,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> MatchResult<()> {
        let c = &self.compatibility;
        if self.question_count == 0 {
            return Err(MatchError::InvalidConfig("question_count must be > 0".into()));
        }
        if self.journal_limit == 0 {
            return Err(MatchError::InvalidConfig("journal_limit must be > 0".into()));
        }
        let finite = [c.base, c.span, c.fuzz, c.floor, c.ceiling, c.neutral_ratio]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(MatchError::InvalidConfig("compatibility values must be finite".into()));
        }
        if c.fuzz < 0.0 {
            return Err(MatchError::InvalidConfig("fuzz must be >= 0".into()));
        }
        if c.floor > c.ceiling || c.ceiling > 99.9 || c.floor < 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "need 0 <= floor ({}) <= ceiling ({}) <= 99.9",
                c.floor, c.ceiling
            )));
        }
        if !(0.0..=1.0).contains(&c.neutral_ratio) {
            return Err(MatchError::InvalidConfig("neutral_ratio must be within [0, 1]".into()));
        }
        Ok(())
    }

    /// Load `engine.json` from the data/ directory. A missing file yields
    /// the defaults; a malformed one is an error.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/engine.json");
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{path} not found, using default engine config");
                return Ok(Self::default());
            }
            Err(e) => return Err(anyhow::anyhow!("Cannot read {path}: {e}")),
        };
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }
}
