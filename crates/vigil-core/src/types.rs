use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn all() -> &'static [RiskLevel] {
        &[
            RiskLevel::Low,
            RiskLevel::Moderate,
            RiskLevel::High,
            RiskLevel::Critical,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Response expectation attached to alerts raised at this level.
    pub fn response_window(self) -> ResponseWindow {
        match self {
            RiskLevel::Critical => ResponseWindow::Immediate,
            RiskLevel::High => ResponseWindow::Within24h,
            RiskLevel::Moderate => ResponseWindow::NextCheckin,
            RiskLevel::Low => ResponseWindow::NotRequired,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = crate::error::VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "moderate" => Ok(RiskLevel::Moderate),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            _ => Err(crate::error::VigilError::InvalidRiskLevel(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ResponseWindow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseWindow {
    Immediate,
    Within24h,
    NextCheckin,
    NotRequired,
}

impl ResponseWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseWindow::Immediate => "immediate",
            ResponseWindow::Within24h => "within_24h",
            ResponseWindow::NextCheckin => "next_checkin",
            ResponseWindow::NotRequired => "not_required",
        }
    }
}

impl fmt::Display for ResponseWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Lexicon category, ordered by the severity it usually signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Concern,
    Distress,
    Crisis,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[Category::Concern, Category::Distress, Category::Crisis]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Concern => "concern",
            Category::Distress => "distress",
            Category::Crisis => "crisis",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::error::VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concern" => Ok(Category::Concern),
            "distress" => Ok(Category::Distress),
            "crisis" => Ok(Category::Crisis),
            _ => Err(crate::error::VigilError::InvalidLexicon(format!(
                "unknown category '{s}': must be concern, distress, or crisis"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Retired,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Active => "active",
            SessionStatus::Retired => "retired",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Emotion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Trust,
    Anticipation,
}

impl Emotion {
    pub fn all() -> &'static [Emotion] {
        &[
            Emotion::Joy,
            Emotion::Sadness,
            Emotion::Anger,
            Emotion::Fear,
            Emotion::Surprise,
            Emotion::Disgust,
            Emotion::Trust,
            Emotion::Anticipation,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
            Emotion::Trust => "trust",
            Emotion::Anticipation => "anticipation",
        }
    }

    /// Polarity contribution of this emotion. Surprise is context-dependent
    /// and carries no weight of its own.
    pub fn polarity_weight(self) -> f64 {
        match self {
            Emotion::Joy => 1.0,
            Emotion::Sadness => -0.8,
            Emotion::Anger => -0.6,
            Emotion::Fear => -0.7,
            Emotion::Surprise => 0.0,
            Emotion::Disgust => -0.5,
            Emotion::Trust => 0.6,
            Emotion::Anticipation => 0.4,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SentimentSignal
// ---------------------------------------------------------------------------

/// Sentiment estimate for a single turn, supplied by a collaborator
/// (or the bundled keyword analyzer).
///
/// `polarity` is in [-1, 1], `confidence` in [0, 1]. A confidence of 0
/// means the signal is unavailable and must not influence scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    pub polarity: f64,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant: Option<Emotion>,
}

impl SentimentSignal {
    pub fn new(polarity: f64, confidence: f64, dominant: Option<Emotion>) -> Self {
        Self {
            polarity: polarity.clamp(-1.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
            dominant,
        }
    }

    /// The degraded-collaborator signal: carries no information.
    pub fn unavailable() -> Self {
        Self {
            polarity: 0.0,
            confidence: 0.0,
            dominant: None,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.polarity < 0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
