//! Weighted phrase lexicon for turn scoring.
//!
//! Layout:
//!   .vigil/lexicon.yaml   — list of entries (category, phrase, weight)
//!
//! The lexicon is loaded once at pipeline construction and never reloaded.
//! Matching is case-insensitive substring containment; overlapping matches
//! within one category collapse to the single highest weight.

use crate::error::{Result, VigilError};
use crate::io;
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub category: Category,
    pub phrase: String,
    pub weight: f64,
}

/// A per-category match result. `weight` is the highest entry weight that
/// matched within the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconMatch {
    pub category: Category,
    pub phrase: String,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

// ---------------------------------------------------------------------------
// Builtin entries
// ---------------------------------------------------------------------------

const CRISIS_WEIGHT: f64 = 0.95;
const DISTRESS_WEIGHT: f64 = 0.7;
const CONCERN_WEIGHT: f64 = 0.45;

const CRISIS_PHRASES: &[&str] = &[
    "kill myself",
    "suicide",
    "suicidal",
    "end my life",
    "want to die",
    "better off dead",
    "no reason to live",
    "end it all",
    "take my own life",
    "hurt myself",
    "self harm",
    "cut myself",
    "burn myself",
    "harm myself",
    "injure myself",
    "plan to die",
    "suicide plan",
];

const DISTRESS_PHRASES: &[&str] = &[
    "hopeless",
    "no hope",
    "never get better",
    "nothing will help",
    "pointless",
    "no point in trying",
    "worthless",
    "burden to everyone",
    "everyone hates me",
    "no one cares",
    "better without me",
    "can't go on",
    "can't take it anymore",
    "giving up",
    "done with everything",
    "had enough",
];

const CONCERN_PHRASES: &[&str] = &[
    "really struggling",
    "falling apart",
    "breaking down",
    "can't cope",
    "overwhelmed",
    "drowning",
    "haven't slept",
    "can't sleep",
    "not eating",
    "stopped eating",
    "can't get out of bed",
    "isolated",
    "all alone",
    "no friends",
    "no one to talk to",
    "completely alone",
    "abandoned",
];

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

impl Lexicon {
    /// Build a lexicon from entries, validating each one. Phrases are
    /// normalized to lowercase so matching stays case-insensitive.
    pub fn from_entries(entries: Vec<LexiconEntry>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(entries.len());
        for entry in entries {
            let phrase = entry.phrase.trim().to_lowercase();
            if phrase.is_empty() {
                return Err(VigilError::InvalidLexicon(format!(
                    "empty phrase in category '{}'",
                    entry.category
                )));
            }
            if !(0.0..=1.0).contains(&entry.weight) {
                return Err(VigilError::InvalidLexicon(format!(
                    "weight {} for phrase '{}' must be within [0, 1]",
                    entry.weight, phrase
                )));
            }
            normalized.push(LexiconEntry {
                category: entry.category,
                phrase,
                weight: entry.weight,
            });
        }
        Ok(Self {
            entries: normalized,
        })
    }

    /// The compiled-in default lexicon.
    pub fn builtin() -> Self {
        let mut entries = Vec::new();
        for (phrases, category, weight) in [
            (CRISIS_PHRASES, Category::Crisis, CRISIS_WEIGHT),
            (DISTRESS_PHRASES, Category::Distress, DISTRESS_WEIGHT),
            (CONCERN_PHRASES, Category::Concern, CONCERN_WEIGHT),
        ] {
            for phrase in phrases {
                entries.push(LexiconEntry {
                    category,
                    phrase: (*phrase).to_string(),
                    weight,
                });
            }
        }
        // Builtin entries are known-valid.
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self {
                entries: Vec::new(),
            });
        }
        let entries: Vec<LexiconEntry> = serde_yaml::from_str(&content)?;
        Self::from_entries(entries)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(&self.entries)?;
        io::atomic_write(path, content.as_bytes())
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match `text` against the lexicon. Returns at most one match per
    /// category, strongest first.
    pub fn match_text(&self, text: &str) -> Vec<LexiconMatch> {
        let haystack = text.to_lowercase();
        let mut best: Vec<Option<LexiconMatch>> = vec![None; Category::all().len()];

        for entry in &self.entries {
            if !haystack.contains(&entry.phrase) {
                continue;
            }
            let slot = &mut best[entry.category as usize];
            let replace = match slot {
                Some(m) => entry.weight > m.weight,
                None => true,
            };
            if replace {
                *slot = Some(LexiconMatch {
                    category: entry.category,
                    phrase: entry.phrase.clone(),
                    weight: entry.weight,
                });
            }
        }

        let mut matches: Vec<LexiconMatch> = best.into_iter().flatten().collect();
        matches.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| b.category.cmp(&a.category))
        });
        matches
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: Category, phrase: &str, weight: f64) -> LexiconEntry {
        LexiconEntry {
            category,
            phrase: phrase.to_string(),
            weight,
        }
    }

    #[test]
    fn builtin_covers_all_categories() {
        let lx = Lexicon::builtin();
        for cat in Category::all() {
            assert!(
                lx.entries().iter().any(|e| e.category == *cat),
                "missing category {cat}"
            );
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let lx = Lexicon::builtin();
        let matches = lx.match_text("I feel HOPELESS today");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].category, Category::Distress);
        assert_eq!(matches[0].phrase, "hopeless");
    }

    #[test]
    fn overlapping_matches_collapse_to_max_per_category() {
        let lx = Lexicon::from_entries(vec![
            entry(Category::Concern, "struggling", 0.4),
            entry(Category::Concern, "really struggling", 0.5),
        ])
        .unwrap();
        let matches = lx.match_text("I am really struggling");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].weight, 0.5);
        assert_eq!(matches[0].phrase, "really struggling");
    }

    #[test]
    fn matches_sorted_strongest_first() {
        let lx = Lexicon::builtin();
        let matches = lx.match_text("I'm overwhelmed and feel hopeless");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].category, Category::Distress);
        assert_eq!(matches[1].category, Category::Concern);
        assert!(matches[0].weight > matches[1].weight);
    }

    #[test]
    fn benign_text_matches_nothing() {
        let lx = Lexicon::builtin();
        assert!(lx.match_text("the weather was lovely today").is_empty());
    }

    #[test]
    fn phrases_normalize_to_lowercase() {
        let lx = Lexicon::from_entries(vec![entry(Category::Crisis, "  Hurt Myself ", 0.9)])
            .unwrap();
        let matches = lx.match_text("i might hurt myself");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn rejects_out_of_range_weight() {
        let err = Lexicon::from_entries(vec![entry(Category::Crisis, "x", 1.5)]).unwrap_err();
        assert!(matches!(err, VigilError::InvalidLexicon(_)));
    }

    #[test]
    fn rejects_empty_phrase() {
        let err = Lexicon::from_entries(vec![entry(Category::Concern, "   ", 0.4)]).unwrap_err();
        assert!(matches!(err, VigilError::InvalidLexicon(_)));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lexicon.yaml");
        let lx = Lexicon::builtin();
        lx.save(&path).unwrap();

        let loaded = Lexicon::load(&path).unwrap();
        assert_eq!(loaded.entries().len(), lx.entries().len());
        assert!(!loaded.match_text("no reason to live").is_empty());
    }

    #[test]
    fn empty_file_loads_empty_lexicon() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lexicon.yaml");
        std::fs::write(&path, "\n").unwrap();
        let lx = Lexicon::load(&path).unwrap();
        assert!(lx.is_empty());
    }
}
