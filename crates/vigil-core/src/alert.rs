use crate::error::{Result, VigilError};
use crate::types::{ResponseWindow, RiskLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AlertState
// ---------------------------------------------------------------------------

/// Review state of an alert. `Open` is the only state that transitions;
/// acknowledged and dismissed are terminal and keep who/when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertState {
    Open,
    Acknowledged { by: String, at: DateTime<Utc> },
    Dismissed { by: String, at: DateTime<Utc> },
}

impl AlertState {
    pub fn is_open(&self) -> bool {
        matches!(self, AlertState::Open)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertState::Open => "open",
            AlertState::Acknowledged { .. } => "acknowledged",
            AlertState::Dismissed { .. } => "dismissed",
        }
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// A clinician-facing escalation raised on a rising level edge. The level is
/// the session level at creation and never changes afterwards; alerts are
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub session_id: String,
    pub level: RiskLevel,
    pub summary: String,
    pub response: ResponseWindow,
    pub created_at: DateTime<Utc>,
    pub state: AlertState,
}

impl Alert {
    pub fn new(session_id: impl Into<String>, level: RiskLevel, summary: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.into(),
            level,
            summary: summary.into(),
            response: level.response_window(),
            created_at: Utc::now(),
            state: AlertState::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Acknowledge this alert.
    ///
    /// Open alerts transition; a repeat by the same identity is a no-op.
    /// Anything else (different identity, or the alert was dismissed) fails
    /// and changes nothing.
    pub fn acknowledge(&mut self, by: &str) -> Result<()> {
        self.close(by, false)
    }

    /// Dismiss this alert. Same preconditions as acknowledge.
    pub fn dismiss(&mut self, by: &str) -> Result<()> {
        self.close(by, true)
    }

    fn close(&mut self, by: &str, dismiss: bool) -> Result<()> {
        match &self.state {
            AlertState::Open => {
                let at = Utc::now();
                self.state = if dismiss {
                    AlertState::Dismissed {
                        by: by.to_string(),
                        at,
                    }
                } else {
                    AlertState::Acknowledged {
                        by: by.to_string(),
                        at,
                    }
                };
                Ok(())
            }
            AlertState::Acknowledged { by: prev, .. } if !dismiss && prev == by => Ok(()),
            AlertState::Dismissed { by: prev, .. } if dismiss && prev == by => Ok(()),
            AlertState::Acknowledged { by: prev, .. } | AlertState::Dismissed { by: prev, .. } => {
                Err(VigilError::AlreadyAcknowledged {
                    id: self.id.to_string(),
                    state: self.state.as_str().to_string(),
                    by: prev.clone(),
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
