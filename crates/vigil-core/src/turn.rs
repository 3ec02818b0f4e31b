use crate::config::ScoringConfig;
use crate::error::{Result, VigilError};
use crate::lexicon::{Lexicon, LexiconMatch};
use crate::types::SentimentSignal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// TurnScore
// ---------------------------------------------------------------------------

/// The scored record of one conversational turn. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnScore {
    pub session_id: String,
    pub sequence: u64,
    pub text_len: usize,
    /// At most one match per lexicon category, strongest first.
    pub matches: Vec<LexiconMatch>,
    pub sentiment: SentimentSignal,
    pub score: f64,
    pub scored_at: DateTime<Utc>,
}

impl TurnScore {
    pub fn max_match_weight(&self) -> f64 {
        self.matches.first().map_or(0.0, |m| m.weight)
    }

    pub fn top_match(&self) -> Option<&LexiconMatch> {
        self.matches.first()
    }
}

// ---------------------------------------------------------------------------
// TurnAnalyzer
// ---------------------------------------------------------------------------

/// Pure per-turn scoring over an immutable lexicon. No side effects; all
/// session state lives in the aggregator.
#[derive(Debug, Clone)]
pub struct TurnAnalyzer {
    lexicon: Arc<Lexicon>,
    scoring: ScoringConfig,
}

impl TurnAnalyzer {
    pub fn new(lexicon: Arc<Lexicon>, scoring: ScoringConfig) -> Self {
        Self { lexicon, scoring }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Score one turn. The sequence number is recorded as given; gap and
    /// ordering checks belong to the session aggregator.
    pub fn analyze(
        &self,
        session_id: &str,
        sequence: u64,
        text: &str,
        sentiment: SentimentSignal,
    ) -> Result<TurnScore> {
        if text.trim().is_empty() {
            return Err(VigilError::InvalidInput(
                "turn text is empty or whitespace-only".to_string(),
            ));
        }
        let text_len = text.chars().count();
        if text_len > self.scoring.max_turn_chars {
            return Err(VigilError::InvalidInput(format!(
                "turn text is {} chars, limit is {}",
                text_len, self.scoring.max_turn_chars
            )));
        }

        let matches = self.lexicon.match_text(text);
        let max_weight = matches.first().map_or(0.0, |m| m.weight);
        let negative = if sentiment.is_negative() {
            sentiment.confidence
        } else {
            0.0
        };
        let score = (max_weight * self.scoring.lexicon_weight
            + negative * self.scoring.sentiment_weight)
            .clamp(0.0, 1.0);

        Ok(TurnScore {
            session_id: session_id.to_string(),
            sequence,
            text_len,
            matches,
            sentiment,
            score,
            scored_at: Utc::now(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
