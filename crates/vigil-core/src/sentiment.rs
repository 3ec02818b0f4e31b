//! Bundled keyword sentiment analyzer.
//!
//! The pipeline accepts any externally supplied [`SentimentSignal`]; this
//! module is the default provider. It detects emotion keywords, applies
//! intensifier/diminisher prefixes and negation, and folds the result into
//! a polarity/confidence pair with an optional dominant emotion.

use crate::types::{Emotion, SentimentSignal};

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

fn emotion_keywords(emotion: Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Joy => &[
            "happy", "joyful", "excited", "glad", "pleased", "delighted", "cheerful", "content",
            "grateful", "thankful", "blessed", "wonderful", "amazing", "fantastic", "great",
            "good", "nice", "love", "loving", "caring", "hopeful", "optimistic",
        ],
        Emotion::Sadness => &[
            "sad", "unhappy", "miserable", "depressed", "down", "low", "heartbroken", "grief",
            "mourning", "loss", "lonely", "alone", "empty", "numb", "hopeless", "helpless",
            "worthless", "useless", "crying", "tears", "sobbing", "melancholy", "despair",
        ],
        Emotion::Anger => &[
            "angry", "furious", "rage", "mad", "annoyed", "irritated", "frustrated", "resentful",
            "bitter", "hostile", "hate", "outraged", "enraged", "livid", "fuming",
        ],
        Emotion::Fear => &[
            "afraid", "scared", "frightened", "terrified", "anxious", "worried", "nervous",
            "panicked", "panic", "dread", "horror", "alarmed", "uneasy", "tense", "stressed",
            "overwhelmed", "paranoid", "fearful",
        ],
        Emotion::Surprise => &[
            "surprised", "shocked", "amazed", "astonished", "stunned", "startled", "unexpected",
            "sudden", "wow",
        ],
        Emotion::Disgust => &[
            "disgusted", "revolted", "sickened", "repulsed", "gross", "nauseated", "appalled",
        ],
        Emotion::Trust => &[
            "trust", "faith", "confident", "secure", "safe", "reliable", "believe", "believing",
            "comfortable", "assured",
        ],
        Emotion::Anticipation => &[
            "excited", "eager", "looking forward", "anticipating", "expecting", "hoping",
            "curious", "interested",
        ],
    }
}

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("really", 1.4),
    ("extremely", 1.8),
    ("incredibly", 1.7),
    ("so", 1.3),
    ("super", 1.4),
    ("absolutely", 1.6),
    ("completely", 1.5),
    ("totally", 1.4),
    ("deeply", 1.5),
];

const DIMINISHERS: &[(&str, f64)] = &[
    ("slightly", 0.5),
    ("somewhat", 0.6),
    ("a bit", 0.5),
    ("a little", 0.5),
    ("kind of", 0.6),
    ("sort of", 0.6),
    ("barely", 0.3),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "won't", "wouldn't", "can't", "couldn't",
];

/// Per-keyword confidence contribution before modifiers.
const KEYWORD_CONFIDENCE: f64 = 0.2;

/// Minimum emotion confidence before it is reported as dominant.
const DOMINANT_CUTOFF: f64 = 0.3;

// ---------------------------------------------------------------------------
// SentimentAnalyzer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> SentimentSignal {
        let haystack = text.to_lowercase();

        let mut total_score = 0.0;
        let mut total_weight = 0.0;
        let mut strongest: Option<(Emotion, f64)> = None;

        for &emotion in Emotion::all() {
            let mut base = 0.0;
            let mut found = false;
            for keyword in emotion_keywords(emotion) {
                if !haystack.contains(keyword) {
                    continue;
                }
                found = true;
                let mut intensity = intensity_modifier(&haystack, keyword);
                if is_negated(&haystack, keyword) {
                    intensity = -intensity;
                }
                base += KEYWORD_CONFIDENCE * intensity;
            }
            if !found {
                continue;
            }
            let confidence = base.clamp(-1.0, 1.0);
            total_score += emotion.polarity_weight() * confidence;
            total_weight += confidence;
            if confidence > strongest.map_or(0.0, |(_, c)| c) {
                strongest = Some((emotion, confidence));
            }
        }

        let polarity = if total_weight > 0.0 {
            (total_score / total_weight).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let confidence = (total_weight / 2.0).clamp(0.0, 1.0);
        let dominant = strongest
            .filter(|(_, c)| *c > DOMINANT_CUTOFF)
            .map(|(e, _)| e);

        SentimentSignal::new(polarity, confidence, dominant)
    }
}

// ---------------------------------------------------------------------------
// Prefix-window helpers
// ---------------------------------------------------------------------------

/// Intensity multiplier from modifier words within three words before the
/// keyword's first occurrence.
fn intensity_modifier(text: &str, keyword: &str) -> f64 {
    let Some(pos) = text.find(keyword) else {
        return 1.0;
    };
    let prefix: Vec<&str> = last_words(&text[..pos], 3);
    let joined = prefix.join(" ");

    for (modifier, multiplier) in INTENSIFIERS.iter().chain(DIMINISHERS.iter()) {
        let hit = if modifier.contains(' ') {
            joined.contains(modifier)
        } else {
            prefix.iter().any(|w| clean_word(w) == *modifier)
        };
        if hit {
            return *multiplier;
        }
    }
    1.0
}

/// True if a negation word appears within four words before the keyword's
/// first occurrence.
fn is_negated(text: &str, keyword: &str) -> bool {
    let Some(pos) = text.find(keyword) else {
        return false;
    };
    last_words(&text[..pos], 4)
        .iter()
        .any(|w| NEGATIONS.contains(&clean_word(w)))
}

fn last_words(text: &str, n: usize) -> Vec<&str> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let start = words.len().saturating_sub(n);
    words[start..].to_vec()
}

fn clean_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
