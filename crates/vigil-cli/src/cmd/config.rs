use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use vigil_core::config::{Config, WarnLevel};

// ---------------------------------------------------------------------------
// Subcommand tree
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective scoring and aggregation policy
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        return print_json(&config);
    }

    let s = &config.scoring;
    let a = &config.aggregation;
    println!("Project:   {}", config.project.name);
    println!(
        "Scoring:   lexicon {:.2} + sentiment {:.2}, max turn {} chars",
        s.lexicon_weight, s.sentiment_weight, s.max_turn_chars
    );
    println!("Decay:     {:.2}", a.decay);
    println!(
        "Bands:     moderate >= {:.2}, high >= {:.2}, critical >= {:.2}",
        a.moderate_at, a.high_at, a.critical_at
    );
    println!("Override:  forced critical at >= {:.2}", a.critical_override);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("config ok, no warnings");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
