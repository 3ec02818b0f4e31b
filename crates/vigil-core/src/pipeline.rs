//! The assembled pipeline: lexicon scoring, per-session aggregation, and the
//! escalation engine behind one concurrency-safe facade.
//!
//! Lock order: a session mutex may be held while taking the alert store
//! lock, never the reverse. The outer session map lock is held only for
//! lookup and insert, so distinct sessions score in parallel while turns for
//! one session serialize on its mutex.

use crate::alert::Alert;
use crate::config::{AggregationConfig, Config};
use crate::error::{Result, VigilError};
use crate::lexicon::Lexicon;
use crate::paths;
use crate::session::{LevelTransition, SessionRiskState};
use crate::sink::AlertSink;
use crate::snapshot::Snapshot;
use crate::turn::{TurnAnalyzer, TurnScore};
use crate::types::{RiskLevel, SentimentSignal, SessionStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TurnOutcome
// ---------------------------------------------------------------------------

/// Everything a single `submit_turn` did: the immutable turn record, the
/// session level afterwards, and the transition/alert if the turn caused one.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub score: TurnScore,
    pub level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<LevelTransition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
}

// ---------------------------------------------------------------------------
// SessionSummary
// ---------------------------------------------------------------------------

/// Triage row for one session. `effective_level` floors the computed level
/// at the strongest open alert, so a decayed session stays visible until a
/// clinician acts.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub status: SessionStatus,
    pub level: RiskLevel,
    pub effective_level: RiskLevel,
    pub rolling: f64,
    pub turns: u64,
    pub open_alerts: usize,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// RiskPipeline
// ---------------------------------------------------------------------------

type SessionMap = HashMap<String, Arc<Mutex<SessionRiskState>>>;

pub struct RiskPipeline {
    analyzer: TurnAnalyzer,
    aggregation: AggregationConfig,
    sessions: RwLock<SessionMap>,
    alerts: RwLock<Vec<Alert>>,
    sink: Arc<dyn AlertSink>,
}

impl RiskPipeline {
    pub fn new(config: &Config, lexicon: Arc<Lexicon>, sink: Arc<dyn AlertSink>) -> Self {
        Self {
            analyzer: TurnAnalyzer::new(lexicon, config.scoring.clone()),
            aggregation: config.aggregation.clone(),
            sessions: RwLock::new(HashMap::new()),
            alerts: RwLock::new(Vec::new()),
            sink,
        }
    }

    // -----------------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------------

    pub fn create_session(&self, session_id: &str) -> Result<SessionRiskState> {
        paths::validate_session_id(session_id)?;
        let mut sessions = self.sessions_write();
        if sessions.contains_key(session_id) {
            return Err(VigilError::SessionExists(session_id.to_string()));
        }
        let state = SessionRiskState::new(session_id);
        sessions.insert(session_id.to_string(), Arc::new(Mutex::new(state.clone())));
        tracing::info!(session = %session_id, "session created");
        Ok(state)
    }

    /// Mark a session retired. State stays readable for audit; further turns
    /// are rejected.
    pub fn retire_session(&self, session_id: &str) -> Result<SessionRiskState> {
        let arc = self.session_arc(session_id)?;
        let mut state = lock_session(&arc);
        state.retire();
        tracing::info!(session = %session_id, "session retired");
        Ok(state.clone())
    }

    pub fn get_session_risk_state(&self, session_id: &str) -> Result<SessionRiskState> {
        let arc = self.session_arc(session_id)?;
        let state = lock_session(&arc);
        Ok(state.clone())
    }

    /// The session's computed level floored at its strongest open alert.
    pub fn effective_level(&self, session_id: &str) -> Result<RiskLevel> {
        let state = self.get_session_risk_state(session_id)?;
        let floor = self.open_alert_floor(&state.session_id);
        Ok(state.level.max(floor.unwrap_or(RiskLevel::Low)))
    }

    // -----------------------------------------------------------------------
    // Turn intake
    // -----------------------------------------------------------------------

    /// Score one turn and fold it into the session, raising an alert on a
    /// rising level edge. Validation happens before any state changes; a
    /// failed call leaves the session exactly as it was.
    pub fn submit_turn(
        &self,
        session_id: &str,
        sequence: u64,
        text: &str,
        sentiment: SentimentSignal,
    ) -> Result<TurnOutcome> {
        let arc = self.session_arc(session_id)?;
        let mut state = lock_session(&arc);

        if state.is_retired() {
            return Err(VigilError::SessionRetired(session_id.to_string()));
        }
        let score = self.analyzer.analyze(session_id, sequence, text, sentiment)?;
        let transition = state.observe(&score, &self.aggregation)?;
        let level = state.level;

        tracing::debug!(
            session = %session_id,
            sequence,
            score = score.score,
            rolling = state.rolling,
            "turn scored"
        );

        let alert = match &transition {
            Some(t) if t.is_rising() => {
                let alert = Alert::new(session_id, t.to, alert_summary(t, &score));
                self.alerts_write().push(alert.clone());
                Some(alert)
            }
            _ => None,
        };
        if let Some(t) = &transition {
            tracing::info!(
                session = %session_id,
                from = %t.from,
                to = %t.to,
                forced = t.forced,
                "risk level changed"
            );
        }
        drop(state);

        // Delivery is best-effort and runs outside the session lock so a
        // slow or reentrant sink cannot stall scoring.
        if let Some(alert) = &alert {
            if let Err(e) = self.sink.on_alert_created(alert) {
                tracing::warn!(alert = %alert.id, error = %e, "alert delivery failed");
            }
        }

        Ok(TurnOutcome {
            score,
            level,
            transition,
            alert,
        })
    }

    // -----------------------------------------------------------------------
    // Alert review
    // -----------------------------------------------------------------------

    pub fn acknowledge_alert(&self, id: Uuid, by: &str) -> Result<Alert> {
        let mut alerts = self.alerts_write();
        let alert = find_alert_mut(&mut alerts, id)?;
        alert.acknowledge(by)?;
        tracing::info!(alert = %id, by = %by, "alert acknowledged");
        Ok(alert.clone())
    }

    pub fn dismiss_alert(&self, id: Uuid, by: &str) -> Result<Alert> {
        let mut alerts = self.alerts_write();
        let alert = find_alert_mut(&mut alerts, id)?;
        alert.dismiss(by)?;
        tracing::info!(alert = %id, by = %by, "alert dismissed");
        Ok(alert.clone())
    }

    pub fn get_alert(&self, id: Uuid) -> Result<Alert> {
        let alerts = self.alerts_read();
        alerts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| VigilError::AlertNotFound(id.to_string()))
    }

    /// Open alerts for review, optionally filtered by level. Ordered most
    /// severe first, newest first within a level.
    pub fn list_open_alerts(&self, level: Option<RiskLevel>) -> Vec<Alert> {
        let alerts = self.alerts_read();
        let mut open: Vec<Alert> = alerts
            .iter()
            .filter(|a| a.is_open() && level.is_none_or(|l| a.level == l))
            .cloned()
            .collect();
        sort_for_review(&mut open);
        open
    }

    /// Every alert ever raised, in review order.
    pub fn all_alerts(&self) -> Vec<Alert> {
        let mut all = self.alerts_read().clone();
        sort_for_review(&mut all);
        all
    }

    /// Alerts for one session, oldest first.
    pub fn alerts_for_session(&self, session_id: &str) -> Vec<Alert> {
        let alerts = self.alerts_read();
        let mut own: Vec<Alert> = alerts
            .iter()
            .filter(|a| a.session_id == session_id)
            .cloned()
            .collect();
        own.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        own
    }

    // -----------------------------------------------------------------------
    // Triage views
    // -----------------------------------------------------------------------

    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let states: Vec<SessionRiskState> = {
            let sessions = self.sessions_read();
            sessions.values().map(|arc| lock_session(arc).clone()).collect()
        };

        let alerts = self.alerts_read();
        let mut summaries: Vec<SessionSummary> = states
            .into_iter()
            .map(|state| {
                let open: Vec<&Alert> = alerts
                    .iter()
                    .filter(|a| a.is_open() && a.session_id == state.session_id)
                    .collect();
                let floor = open.iter().map(|a| a.level).max().unwrap_or(RiskLevel::Low);
                SessionSummary {
                    effective_level: state.level.max(floor),
                    open_alerts: open.len(),
                    turns: state.turns(),
                    session_id: state.session_id,
                    status: state.status,
                    level: state.level,
                    rolling: state.rolling,
                    updated_at: state.updated_at,
                }
            })
            .collect();
        summaries.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        summaries
    }

    /// Sessions a clinician should look at now: effective level high or above.
    pub fn flagged_sessions(&self) -> Vec<SessionSummary> {
        let mut flagged = self.list_sessions();
        flagged.retain(|s| s.effective_level >= RiskLevel::High);
        flagged
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        let mut sessions: Vec<SessionRiskState> = {
            let map = self.sessions_read();
            map.values().map(|arc| lock_session(arc).clone()).collect()
        };
        sessions.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        let alerts = self.alerts_read().clone();
        Snapshot::new(sessions, alerts)
    }

    /// Replace all session and alert state with the snapshot's contents.
    pub fn restore(&self, snapshot: Snapshot) {
        let mut map = HashMap::new();
        for state in snapshot.sessions {
            map.insert(state.session_id.clone(), Arc::new(Mutex::new(state)));
        }
        *self.sessions_write() = map;
        *self.alerts_write() = snapshot.alerts;
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn session_arc(&self, session_id: &str) -> Result<Arc<Mutex<SessionRiskState>>> {
        let sessions = self.sessions_read();
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| VigilError::SessionNotFound(session_id.to_string()))
    }

    fn open_alert_floor(&self, session_id: &str) -> Option<RiskLevel> {
        let alerts = self.alerts_read();
        alerts
            .iter()
            .filter(|a| a.is_open() && a.session_id == session_id)
            .map(|a| a.level)
            .max()
    }

    // A poisoned lock yields its data; a panicking reader must not wedge
    // the whole pipeline.

    fn sessions_read(&self) -> RwLockReadGuard<'_, SessionMap> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn sessions_write(&self) -> RwLockWriteGuard<'_, SessionMap> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn alerts_read(&self) -> RwLockReadGuard<'_, Vec<Alert>> {
        self.alerts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn alerts_write(&self) -> RwLockWriteGuard<'_, Vec<Alert>> {
        self.alerts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock_session(arc: &Arc<Mutex<SessionRiskState>>) -> MutexGuard<'_, SessionRiskState> {
    arc.lock().unwrap_or_else(PoisonError::into_inner)
}

fn find_alert_mut(alerts: &mut [Alert], id: Uuid) -> Result<&mut Alert> {
    alerts
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| VigilError::AlertNotFound(id.to_string()))
}

fn sort_for_review(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        b.level
            .cmp(&a.level)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

fn alert_summary(transition: &LevelTransition, score: &TurnScore) -> String {
    let mut summary = format!(
        "risk rose from {} to {} at turn {}",
        transition.from, transition.to, transition.sequence
    );
    if let Some(m) = score.top_match() {
        summary.push_str(&format!(" (matched '{}')", m.phrase));
    }
    summary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
