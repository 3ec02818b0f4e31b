//! Notification sinks — the outward edge of the pipeline.
//!
//! A sink is invoked synchronously after an alert is recorded. Delivery is
//! best-effort: a sink failure is logged by the caller and never rolls back
//! the alert.

use crate::alert::Alert;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("sink delivery failed: {0}")]
pub struct SinkError(pub String);

pub trait AlertSink: Send + Sync {
    fn on_alert_created(&self, alert: &Alert) -> Result<(), SinkError>;
}

// ---------------------------------------------------------------------------
// NullSink
// ---------------------------------------------------------------------------

/// Discards every alert. Useful for embedders that poll instead.
#[derive(Debug, Default)]
pub struct NullSink;

impl AlertSink for NullSink {
    fn on_alert_created(&self, _alert: &Alert) -> Result<(), SinkError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LogSink
// ---------------------------------------------------------------------------

/// Emits each alert as a structured log event.
#[derive(Debug, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn on_alert_created(&self, alert: &Alert) -> Result<(), SinkError> {
        tracing::info!(
            alert = %alert.id,
            session = %alert.session_id,
            level = %alert.level,
            response = %alert.response,
            "alert created"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// Records delivered alerts in memory. Intended for tests and inspection;
/// can be constructed failing to exercise delivery-error handling.
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<Alert>>,
    fail: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn delivered(&self) -> Vec<Alert> {
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl AlertSink for MemorySink {
    fn on_alert_created(&self, alert: &Alert) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError("simulated delivery failure".to_string()));
        }
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(alert.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskLevel;

    #[test]
    fn memory_sink_records_deliveries() {
        let sink = MemorySink::new();
        let alert = Alert::new("s1", RiskLevel::High, "risk rose from low to high");
        sink.on_alert_created(&alert).unwrap();

        let delivered = sink.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].id, alert.id);
    }

    #[test]
    fn failing_sink_returns_error() {
        let sink = MemorySink::failing();
        let alert = Alert::new("s1", RiskLevel::High, "x");
        assert!(sink.on_alert_created(&alert).is_err());
        assert!(sink.delivered().is_empty());
    }

    #[test]
    fn null_sink_accepts_everything() {
        let sink = NullSink;
        let alert = Alert::new("s1", RiskLevel::Critical, "x");
        assert!(sink.on_alert_created(&alert).is_ok());
    }
}
