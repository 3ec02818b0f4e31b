mod cmd;
mod output;
mod root;
mod store;

use clap::{Parser, Subcommand};
use cmd::{alert::AlertSubcommand, config::ConfigSubcommand, session::SessionSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vigil",
    about = "Conversation risk triage — score session turns, track escalation, review alerts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .vigil/ or .git/)
    #[arg(long, global = true, env = "VIGIL_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize vigil in the current project
    Init,

    /// Manage monitored sessions
    Session {
        #[command(subcommand)]
        subcommand: SessionSubcommand,
    },

    /// Score one conversation turn
    Turn {
        /// Session id
        session: String,

        /// Turn text
        text: String,

        /// Sequence number (default: next in order)
        #[arg(long)]
        seq: Option<u64>,
    },

    /// Replay a transcript file (one turn per line) through the pipeline
    Ingest {
        /// Session id
        session: String,

        /// Transcript path
        file: PathBuf,
    },

    /// Review escalation alerts
    Alert {
        #[command(subcommand)]
        subcommand: AlertSubcommand,
    },

    /// Inspect and validate the scoring configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Session { subcommand } => cmd::session::run(&root, subcommand, cli.json),
        Commands::Turn { session, text, seq } => {
            cmd::turn::run(&root, &session, &text, seq, cli.json)
        }
        Commands::Ingest { session, file } => cmd::turn::ingest(&root, &session, &file, cli.json),
        Commands::Alert { subcommand } => cmd::alert::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // anyhow's alternate Display prints the whole chain
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
