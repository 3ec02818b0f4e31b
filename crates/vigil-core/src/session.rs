use crate::config::AggregationConfig;
use crate::error::{Result, VigilError};
use crate::turn::TurnScore;
use crate::types::{RiskLevel, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LevelTransition
// ---------------------------------------------------------------------------

/// One recorded level change. `forced` marks transitions driven by the
/// single-turn critical override rather than the rolling score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTransition {
    pub from: RiskLevel,
    pub to: RiskLevel,
    pub sequence: u64,
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub forced: bool,
}

impl LevelTransition {
    /// A rising edge is the only thing that may raise an alert.
    pub fn is_rising(&self) -> bool {
        self.to > self.from
    }
}

// ---------------------------------------------------------------------------
// SessionRiskState
// ---------------------------------------------------------------------------

/// Per-session aggregate. Mutated only through [`SessionRiskState::observe`],
/// which validates fully before touching any field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRiskState {
    pub session_id: String,
    pub status: SessionStatus,
    pub level: RiskLevel,
    pub rolling: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sequence: Option<u64>,
    pub transitions: Vec<LevelTransition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRiskState {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            status: SessionStatus::Active,
            level: RiskLevel::Low,
            rolling: 0.0,
            last_sequence: None,
            transitions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_retired(&self) -> bool {
        self.status == SessionStatus::Retired
    }

    /// Number of turns observed so far. Sequences are gapless from 1, so the
    /// last accepted sequence is also the count.
    pub fn turns(&self) -> u64 {
        self.last_sequence.unwrap_or(0)
    }

    pub fn retire(&mut self) {
        self.status = SessionStatus::Retired;
        self.updated_at = Utc::now();
    }

    /// Fold one scored turn into the rolling state.
    ///
    /// Sequences must be strictly increasing and gapless, starting at 1. Any
    /// violation leaves the state untouched. Returns the level transition if
    /// the turn caused one.
    pub fn observe(
        &mut self,
        turn: &TurnScore,
        cfg: &AggregationConfig,
    ) -> Result<Option<LevelTransition>> {
        if self.is_retired() {
            return Err(VigilError::SessionRetired(self.session_id.clone()));
        }
        let expected = self.last_sequence.map_or(1, |s| s + 1);
        if turn.sequence != expected {
            return Err(VigilError::SequenceViolation {
                session: self.session_id.clone(),
                expected,
                got: turn.sequence,
            });
        }

        self.rolling = self.rolling * cfg.decay + turn.score * (1.0 - cfg.decay);
        self.last_sequence = Some(turn.sequence);
        self.updated_at = Utc::now();

        let forced = turn.max_match_weight() >= cfg.critical_override
            || turn.score >= cfg.critical_override;
        let next = if forced {
            RiskLevel::Critical
        } else {
            cfg.level_for(self.rolling)
        };

        if next == self.level {
            return Ok(None);
        }

        let transition = LevelTransition {
            from: self.level,
            to: next,
            sequence: turn.sequence,
            at: self.updated_at,
            forced,
        };
        self.level = next;
        self.transitions.push(transition.clone());
        Ok(Some(transition))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
