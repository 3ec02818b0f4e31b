use crate::output::print_json;
use crate::store::Store;
use anyhow::Context;
use std::path::Path;
use vigil_core::pipeline::TurnOutcome;
use vigil_core::sentiment::SentimentAnalyzer;

// ---------------------------------------------------------------------------
// vigil turn
// ---------------------------------------------------------------------------

pub fn run(
    root: &Path,
    session: &str,
    text: &str,
    seq: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    let outcome = submit(&store, session, text, seq)?;
    store.save()?;

    if json {
        print_json(&outcome)?;
    } else {
        report(&outcome);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// vigil ingest
// ---------------------------------------------------------------------------

/// Replay a transcript, one turn per non-empty line. Stops at the first
/// failing line; nothing is saved on error.
pub fn ingest(root: &Path, session: &str, file: &Path, json: bool) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut outcomes = Vec::new();
    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        outcomes.push(submit(&store, session, line, None)?);
    }
    store.save()?;

    if json {
        return print_json(&outcomes);
    }
    println!("ingested {} turns into '{session}'", outcomes.len());
    for outcome in &outcomes {
        report(outcome);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared scoring path
// ---------------------------------------------------------------------------

fn submit(store: &Store, session: &str, text: &str, seq: Option<u64>) -> anyhow::Result<TurnOutcome> {
    let sequence = match seq {
        Some(s) => s,
        None => store.pipeline.get_session_risk_state(session)?.turns() + 1,
    };
    let sentiment = SentimentAnalyzer::new().analyze(text);
    let outcome = store.pipeline.submit_turn(session, sequence, text, sentiment)?;
    Ok(outcome)
}

fn report(outcome: &TurnOutcome) {
    println!(
        "turn {:>4}  score {:.3}  level {}",
        outcome.score.sequence, outcome.score.score, outcome.level
    );
    if let Some(m) = outcome.score.top_match() {
        println!(
            "  matched: '{}' ({}, weight {:.2})",
            m.phrase, m.category, m.weight
        );
    }
    let sentiment = &outcome.score.sentiment;
    if let Some(d) = sentiment.dominant {
        println!(
            "  sentiment: {d} (polarity {:+.2}, confidence {:.2})",
            sentiment.polarity, sentiment.confidence
        );
    }
    if let Some(t) = &outcome.transition {
        let mark = if t.forced { " (forced)" } else { "" };
        println!("  level change: {} -> {}{mark}", t.from, t.to);
    }
    if let Some(a) = &outcome.alert {
        println!("  ALERT {}  {}  respond: {}", a.id, a.level, a.response);
    }
}
