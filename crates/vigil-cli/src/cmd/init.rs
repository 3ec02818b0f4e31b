use anyhow::Context;
use std::path::Path;
use vigil_core::{config::Config, io, lexicon::Lexicon, paths, snapshot::Snapshot};

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    println!("Initializing vigil in: {}", root.display());

    io::ensure_dir(&paths::vigil_dir(root)).context("failed to create .vigil")?;

    let config_path = paths::config_path(root);
    if !config_path.exists() {
        Config::new(project_name)
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    let lexicon_path = paths::lexicon_path(root);
    if !lexicon_path.exists() {
        Lexicon::builtin()
            .save(&lexicon_path)
            .context("failed to write lexicon.yaml")?;
        println!("  created: {}", paths::LEXICON_FILE);
    } else {
        println!("  exists:  {}", paths::LEXICON_FILE);
    }

    let state_path = paths::state_path(root);
    if !state_path.exists() {
        Snapshot::empty()
            .save(root)
            .context("failed to write state.yaml")?;
        println!("  created: {}", paths::STATE_FILE);
    } else {
        println!("  exists:  {}", paths::STATE_FILE);
    }

    println!("\nvigil initialized.");
    println!("Next: vigil session create <id>");

    Ok(())
}
