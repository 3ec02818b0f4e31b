use crate::error::{Result, VigilError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const VIGIL_DIR: &str = ".vigil";

pub const CONFIG_FILE: &str = ".vigil/config.yaml";
pub const LEXICON_FILE: &str = ".vigil/lexicon.yaml";
pub const STATE_FILE: &str = ".vigil/state.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn vigil_dir(root: &Path) -> PathBuf {
    root.join(VIGIL_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn lexicon_path(root: &Path) -> PathBuf {
    root.join(LEXICON_FILE)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

// ---------------------------------------------------------------------------
// Session id validation
// ---------------------------------------------------------------------------

static SESSION_ID_RE: OnceLock<Regex> = OnceLock::new();

fn session_id_re() -> &'static Regex {
    SESSION_ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.:\-]*$").unwrap())
}

/// Session ids arrive from the conversation layer. They are opaque, but a
/// conservative shape is enforced so they stay safe in logs and filenames.
pub fn validate_session_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 128 || !session_id_re().is_match(id) {
        return Err(VigilError::InvalidSessionId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_session_ids() {
        for id in [
            "s1",
            "user-42",
            "9f8e7d6c-5b4a-3210-9f8e-7d6c5b4a3210",
            "chat:2026-08-01.153000",
            "A",
        ] {
            validate_session_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
    }

    #[test]
    fn invalid_session_ids() {
        let too_long = "x".repeat(129);
        for id in ["", "-leading-dash", "has spaces", "semi;colon", too_long.as_str()] {
            assert!(validate_session_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.vigil/config.yaml")
        );
        assert_eq!(
            lexicon_path(root),
            PathBuf::from("/tmp/proj/.vigil/lexicon.yaml")
        );
        assert_eq!(state_path(root), PathBuf::from("/tmp/proj/.vigil/state.yaml"));
    }
}
