use crate::error::{Result, VigilError};
use crate::paths;
use crate::types::RiskLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ScoringConfig
// ---------------------------------------------------------------------------

/// Knobs for per-turn scoring. Weights blend the lexicon component with the
/// negative-sentiment component; the result is clamped to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_lexicon_weight")]
    pub lexicon_weight: f64,
    #[serde(default = "default_sentiment_weight")]
    pub sentiment_weight: f64,
    #[serde(default = "default_max_turn_chars")]
    pub max_turn_chars: usize,
}

fn default_lexicon_weight() -> f64 {
    0.7
}

fn default_sentiment_weight() -> f64 {
    0.3
}

fn default_max_turn_chars() -> usize {
    5000
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lexicon_weight: default_lexicon_weight(),
            sentiment_weight: default_sentiment_weight(),
            max_turn_chars: default_max_turn_chars(),
        }
    }
}

// ---------------------------------------------------------------------------
// AggregationConfig
// ---------------------------------------------------------------------------

/// Knobs for the per-session rolling score and its mapping to risk levels.
///
/// The rolling score updates as `rolling * decay + turn_score * (1 - decay)`.
/// Band edges are inclusive lower bounds: a rolling score of exactly
/// `moderate_at` is moderate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default = "default_decay")]
    pub decay: f64,
    #[serde(default = "default_moderate_at")]
    pub moderate_at: f64,
    #[serde(default = "default_high_at")]
    pub high_at: f64,
    #[serde(default = "default_critical_at")]
    pub critical_at: f64,
    /// A single turn at or above this (by lexicon match weight or final
    /// score) forces the session to critical regardless of the rolling score.
    #[serde(default = "default_critical_override")]
    pub critical_override: f64,
}

fn default_decay() -> f64 {
    0.6
}

fn default_moderate_at() -> f64 {
    0.3
}

fn default_high_at() -> f64 {
    0.55
}

fn default_critical_at() -> f64 {
    0.8
}

fn default_critical_override() -> f64 {
    0.9
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            decay: default_decay(),
            moderate_at: default_moderate_at(),
            high_at: default_high_at(),
            critical_at: default_critical_at(),
            critical_override: default_critical_override(),
        }
    }
}

impl AggregationConfig {
    pub fn level_for(&self, rolling: f64) -> RiskLevel {
        if rolling >= self.critical_at {
            RiskLevel::Critical
        } else if rolling >= self.high_at {
            RiskLevel::High
        } else if rolling >= self.moderate_at {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            scoring: ScoringConfig::default(),
            aggregation: AggregationConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(VigilError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let s = &self.scoring;
        for (name, v) in [
            ("scoring.lexicon_weight", s.lexicon_weight),
            ("scoring.sentiment_weight", s.sentiment_weight),
        ] {
            if !(0.0..=1.0).contains(&v) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{name}={v} must be within [0, 1]"),
                });
            }
        }
        if (s.lexicon_weight + s.sentiment_weight - 1.0).abs() > 1e-9 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "scoring weights sum to {} (lexicon + sentiment is usually 1.0)",
                    s.lexicon_weight + s.sentiment_weight
                ),
            });
        }
        if s.max_turn_chars == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "scoring.max_turn_chars must be greater than 0".to_string(),
            });
        }

        let a = &self.aggregation;
        if !(0.0..1.0).contains(&a.decay) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("aggregation.decay={} must be within [0, 1)", a.decay),
            });
        }
        let ordered = 0.0 < a.moderate_at
            && a.moderate_at < a.high_at
            && a.high_at < a.critical_at
            && a.critical_at <= 1.0;
        if !ordered {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "aggregation thresholds must satisfy 0 < moderate_at ({}) < high_at ({}) < critical_at ({}) <= 1",
                    a.moderate_at, a.high_at, a.critical_at
                ),
            });
        }
        if !(0.0..=1.0).contains(&a.critical_override) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "aggregation.critical_override={} must be within [0, 1]",
                    a.critical_override
                ),
            });
        } else if a.critical_override < a.critical_at {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "aggregation.critical_override ({}) is below critical_at ({}) — single turns will escalate more eagerly than the rolling score",
                    a.critical_override, a.critical_at
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
