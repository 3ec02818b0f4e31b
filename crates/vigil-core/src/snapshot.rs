//! Durable pipeline state: every session's risk state plus the alert log,
//! serialized as one YAML document under `.vigil/`.

use crate::alert::Alert;
use crate::error::{Result, VigilError};
use crate::io;
use crate::paths;
use crate::session::SessionRiskState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SNAPSHOT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub sessions: Vec<SessionRiskState>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

impl Snapshot {
    pub fn new(sessions: Vec<SessionRiskState>, alerts: Vec<Alert>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            sessions,
            alerts,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Load the snapshot from `.vigil/state.yaml`. A missing file is an
    /// empty snapshot, so a freshly initialized root works without one.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::state_path(root);
        if !path.exists() {
            if !paths::vigil_dir(root).exists() {
                return Err(VigilError::NotInitialized);
            }
            return Ok(Self::empty());
        }
        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(Self::empty());
        }
        let snapshot: Snapshot = serde_yaml::from_str(&raw)?;
        Ok(snapshot)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let raw = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::state_path(root), raw.as_bytes())?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
