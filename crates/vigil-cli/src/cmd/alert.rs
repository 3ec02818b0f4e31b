use crate::output::{format_ts, print_json, print_table, truncate};
use crate::store::Store;
use clap::Subcommand;
use std::path::Path;
use uuid::Uuid;
use vigil_core::alert::{Alert, AlertState};
use vigil_core::types::RiskLevel;

// ---------------------------------------------------------------------------
// Subcommand tree
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum AlertSubcommand {
    /// List alerts (default: open only), most severe first
    List {
        /// Filter by level: low | moderate | high | critical
        #[arg(long)]
        level: Option<String>,

        /// Include acknowledged and dismissed alerts
        #[arg(long)]
        all: bool,
    },

    /// Show details of a single alert
    Show {
        /// Alert id (UUID)
        id: Uuid,
    },

    /// Acknowledge an alert
    Ack {
        /// Alert id (UUID)
        id: Uuid,

        /// Reviewer identity
        #[arg(long)]
        by: String,
    },

    /// Dismiss an alert (reviewed, no action needed)
    Dismiss {
        /// Alert id (UUID)
        id: Uuid,

        /// Reviewer identity
        #[arg(long)]
        by: String,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: AlertSubcommand, json: bool) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    match subcmd {
        AlertSubcommand::List { level, all } => {
            let level = level.map(|l| l.parse::<RiskLevel>()).transpose()?;
            let alerts = if all {
                let mut alerts = store.pipeline.all_alerts();
                if let Some(l) = level {
                    alerts.retain(|a| a.level == l);
                }
                alerts
            } else {
                store.pipeline.list_open_alerts(level)
            };
            list(&alerts, json)
        }

        AlertSubcommand::Show { id } => {
            let alert = store.pipeline.get_alert(id)?;
            if json {
                print_json(&alert)?;
            } else {
                show(&alert);
            }
            Ok(())
        }

        AlertSubcommand::Ack { id, by } => {
            let alert = store.pipeline.acknowledge_alert(id, &by)?;
            store.save()?;
            if json {
                print_json(&alert)?;
            } else {
                println!("acknowledged alert {} (by '{by}')", alert.id);
            }
            Ok(())
        }

        AlertSubcommand::Dismiss { id, by } => {
            let alert = store.pipeline.dismiss_alert(id, &by)?;
            store.save()?;
            if json {
                print_json(&alert)?;
            } else {
                println!("dismissed alert {} (by '{by}')", alert.id);
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(alerts: &[Alert], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&alerts);
    }
    if alerts.is_empty() {
        println!("no alerts");
        return Ok(());
    }
    print_table(
        &["ID", "SESSION", "LEVEL", "STATE", "CREATED", "SUMMARY"],
        alerts
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.session_id.clone(),
                    a.level.to_string(),
                    a.state.as_str().to_string(),
                    format_ts(&a.created_at),
                    truncate(&a.summary, 48),
                ]
            })
            .collect(),
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(alert: &Alert) {
    println!("Alert:    {}", alert.id);
    println!("Session:  {}", alert.session_id);
    println!("Level:    {}", alert.level);
    println!("Respond:  {}", alert.response);
    println!("State:    {}", alert.state);
    match &alert.state {
        AlertState::Acknowledged { by, at } | AlertState::Dismissed { by, at } => {
            println!("  by '{by}' at {}", format_ts(at));
        }
        AlertState::Open => {}
    }
    println!("Created:  {}", format_ts(&alert.created_at));
    println!("Summary:  {}", alert.summary);
}
