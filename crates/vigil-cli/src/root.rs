use std::path::{Path, PathBuf};

/// Resolve the vigil root directory.
///
/// Priority:
/// 1. `--root` flag / `VIGIL_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.vigil/`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    for marker in [".vigil", ".git"] {
        if let Some(found) = walk_up(&cwd, marker) {
            return found;
        }
    }

    cwd
}

fn walk_up(start: &Path, marker: &str) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(marker).is_dir() {
            return Some(dir);
        }
        dir = dir.parent()?.to_path_buf();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_root(Some(dir.path())), dir.path());
    }

    #[test]
    fn walk_up_finds_marker_from_nested_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".vigil")).unwrap();
        let nested = dir.path().join("notes/deep");
        std::fs::create_dir_all(&nested).unwrap();

        let found = walk_up(&nested, ".vigil").unwrap();
        assert_eq!(found, dir.path());
    }
}
