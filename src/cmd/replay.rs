//! Drag intent replay: `netboard replay`.

use std::path::Path;

use anyhow::{Context, Result};
use network_board::board::DragIntent;
use network_board::config::BoardToml;

use super::board::print_board;
use super::open_board;

/// Feed every intent in the file through the reconciler, printing one JSON
/// line per step. Rejected intents are reported and replay continues.
pub async fn cmd_replay(config: &BoardToml, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let intents: Vec<DragIntent> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse drag intents from {}", file.display()))?;

    let mut reconciler = open_board(config).await?;
    for (step, intent) in intents.into_iter().enumerate() {
        let line = match reconciler.apply(intent.clone()).await {
            Ok(outcome) => serde_json::json!({
                "step": step,
                "intent": intent,
                "outcome": outcome,
            }),
            Err(err) => serde_json::json!({
                "step": step,
                "intent": intent,
                "error": err.to_string(),
            }),
        };
        println!("{}", line);
    }

    println!();
    print_board(reconciler.columns());
    Ok(())
}
