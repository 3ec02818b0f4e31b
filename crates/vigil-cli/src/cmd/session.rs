use crate::output::{format_ts, print_json, print_table, truncate};
use crate::store::Store;
use clap::Subcommand;
use std::path::Path;
use vigil_core::pipeline::SessionSummary;

// ---------------------------------------------------------------------------
// Subcommand tree
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum SessionSubcommand {
    /// Register a session for monitoring
    Create {
        /// Session id (letters, digits, '-', '_', '.', ':')
        id: String,
    },

    /// Retire a session; state stays readable, new turns are rejected
    Retire { id: String },

    /// Show one session's risk state, transitions, and alerts
    Show { id: String },

    /// List all sessions
    List,

    /// List sessions needing attention (effective level high or critical)
    Flagged,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: SessionSubcommand, json: bool) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    match subcmd {
        SessionSubcommand::Create { id } => {
            let state = store.pipeline.create_session(&id)?;
            store.save()?;
            if json {
                print_json(&state)?;
            } else {
                println!("created session '{}'", state.session_id);
            }
            Ok(())
        }

        SessionSubcommand::Retire { id } => {
            let state = store.pipeline.retire_session(&id)?;
            store.save()?;
            if json {
                print_json(&state)?;
            } else {
                println!("retired session '{}'", state.session_id);
            }
            Ok(())
        }

        SessionSubcommand::Show { id } => show(&store, &id, json),

        SessionSubcommand::List => list(store.pipeline.list_sessions(), json, "no sessions"),

        SessionSubcommand::Flagged => list(
            store.pipeline.flagged_sessions(),
            json,
            "no flagged sessions",
        ),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(store: &Store, id: &str, json: bool) -> anyhow::Result<()> {
    let state = store.pipeline.get_session_risk_state(id)?;
    let effective = store.pipeline.effective_level(id)?;
    let alerts = store.pipeline.alerts_for_session(id);

    if json {
        let value = serde_json::json!({
            "state": state,
            "effective_level": effective,
            "alerts": alerts,
        });
        return print_json(&value);
    }

    println!("Session:   {}", state.session_id);
    println!("Status:    {}", state.status);
    println!("Level:     {}", state.level);
    if effective != state.level {
        println!("Effective: {effective} (open alert)");
    }
    println!("Rolling:   {:.4}", state.rolling);
    println!("Turns:     {}", state.turns());
    println!("Updated:   {}", format_ts(&state.updated_at));

    if !state.transitions.is_empty() {
        println!("Transitions:");
        for t in &state.transitions {
            let mark = if t.forced { " (forced)" } else { "" };
            println!("  turn {:>4}  {} -> {}{mark}", t.sequence, t.from, t.to);
        }
    }
    if !alerts.is_empty() {
        println!("Alerts:");
        for a in &alerts {
            println!(
                "  {}  {:<8}  {:<12}  {}",
                a.id,
                a.level,
                a.state,
                truncate(&a.summary, 48)
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// list / flagged
// ---------------------------------------------------------------------------

fn list(summaries: Vec<SessionSummary>, json: bool, empty_msg: &str) -> anyhow::Result<()> {
    if json {
        return print_json(&summaries);
    }
    if summaries.is_empty() {
        println!("{empty_msg}");
        return Ok(());
    }
    print_table(
        &[
            "SESSION",
            "STATUS",
            "LEVEL",
            "EFFECTIVE",
            "ROLLING",
            "TURNS",
            "OPEN ALERTS",
        ],
        summaries
            .iter()
            .map(|s| {
                vec![
                    s.session_id.clone(),
                    s.status.to_string(),
                    s.level.to_string(),
                    s.effective_level.to_string(),
                    format!("{:.4}", s.rolling),
                    s.turns.to_string(),
                    s.open_alerts.to_string(),
                ]
            })
            .collect(),
    );
    Ok(())
}
