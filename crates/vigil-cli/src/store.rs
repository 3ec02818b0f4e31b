//! Glue between the on-disk `.vigil/` layout and the in-memory pipeline.
//! Each CLI invocation opens a store, applies its change, and saves the
//! snapshot back atomically.

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vigil_core::config::Config;
use vigil_core::lexicon::Lexicon;
use vigil_core::paths;
use vigil_core::pipeline::RiskPipeline;
use vigil_core::sink::LogSink;
use vigil_core::snapshot::Snapshot;

pub struct Store {
    root: PathBuf,
    pub config: Config,
    pub pipeline: RiskPipeline,
}

impl Store {
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        let config = Config::load(root).context("failed to load config")?;
        let lexicon = load_lexicon(root)?;
        let pipeline = RiskPipeline::new(&config, Arc::new(lexicon), Arc::new(LogSink));
        let snapshot = Snapshot::load(root).context("failed to load state")?;
        pipeline.restore(snapshot);
        Ok(Self {
            root: root.to_path_buf(),
            config,
            pipeline,
        })
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.pipeline
            .snapshot()
            .save(&self.root)
            .context("failed to save state")
    }
}

/// A checked-in `.vigil/lexicon.yaml` overrides the compiled-in default.
fn load_lexicon(root: &Path) -> anyhow::Result<Lexicon> {
    let path = paths::lexicon_path(root);
    if path.exists() {
        Lexicon::load(&path).context("failed to load lexicon")
    } else {
        Ok(Lexicon::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vigil_core::io;

    #[test]
    fn open_fails_before_init() {
        let dir = TempDir::new().unwrap();
        assert!(Store::open(dir.path()).is_err());
    }

    #[test]
    fn open_falls_back_to_builtin_lexicon() {
        let dir = TempDir::new().unwrap();
        io::ensure_dir(&paths::vigil_dir(dir.path())).unwrap();
        Config::new("t").save(dir.path()).unwrap();

        let store = Store::open(dir.path()).unwrap();
        store.pipeline.create_session("s1").unwrap();
        let out = store
            .pipeline
            .submit_turn(
                "s1",
                1,
                "I want to kill myself",
                vigil_core::types::SentimentSignal::unavailable(),
            )
            .unwrap();
        assert!(out.alert.is_some());
    }

    #[test]
    fn save_and_reopen_round_trip() {
        let dir = TempDir::new().unwrap();
        io::ensure_dir(&paths::vigil_dir(dir.path())).unwrap();
        Config::new("t").save(dir.path()).unwrap();

        let store = Store::open(dir.path()).unwrap();
        store.pipeline.create_session("s1").unwrap();
        store.save().unwrap();

        let reopened = Store::open(dir.path()).unwrap();
        assert!(reopened.pipeline.get_session_risk_state("s1").is_ok());
    }
}
