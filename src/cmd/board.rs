//! Card placement commands: `netboard board`.

use std::time::Duration;

use anyhow::Result;
use board_common::Column;
use board_common::models::card_id;
use console::style;
use network_board::board::{BoardPoller, ReconcileOutcome};

use super::super::BoardCommands;
use super::{http_client, open_board};
use network_board::config::BoardToml;

/// `from` must be one of the columns currently holding the person's card.
fn check_source_column(columns: &[&str], person_id: &str, from: &str) -> Result<()> {
    if columns.is_empty() {
        anyhow::bail!("Person {} is not on the board", person_id);
    }
    if !columns.contains(&from) {
        anyhow::bail!(
            "Person {} is in column '{}', not '{}'",
            person_id,
            columns.join("', '"),
            from
        );
    }
    Ok(())
}

pub async fn cmd_board(config: &BoardToml, command: BoardCommands) -> Result<()> {
    match command {
        BoardCommands::Show => {
            let reconciler = open_board(config).await?;
            print_board(reconciler.columns());
            let unplaced = reconciler
                .people()
                .iter()
                .filter(|p| reconciler.board().columns_containing(&p.id).is_empty())
                .count();
            if unplaced > 0 {
                println!(
                    "{}",
                    style(format!("{} people not on the board", unplaced)).dim()
                );
            }
        }
        BoardCommands::Add {
            person_id,
            column_id,
        } => {
            let mut reconciler = open_board(config).await?;
            let outcome = reconciler.add_person(&person_id, &column_id).await?;
            report(&outcome)?;
        }
        BoardCommands::Move {
            person_id,
            from,
            to,
        } => {
            let mut reconciler = open_board(config).await?;
            check_source_column(
                &reconciler.board().columns_containing(&person_id),
                &person_id,
                &from,
            )?;
            let outcome = reconciler.move_card(&card_id(&person_id), &to).await?;
            report(&outcome)?;
        }
        BoardCommands::Watch { interval } => {
            let client = http_client(config)?;
            let interval = interval
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or_else(|| config.client.poll_interval());
            let poller = BoardPoller::spawn(client.clone(), client, interval);
            let mut rx = poller.subscribe();
            println!(
                "Watching {} every {}s (Ctrl+C to stop)",
                config.client.base_url,
                interval.as_secs()
            );
            loop {
                tokio::select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let board = rx.borrow_and_update().clone();
                        if let Some(columns) = board {
                            println!();
                            print_board(&columns);
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            poller.stop().await;
        }
    }
    Ok(())
}

fn report(outcome: &ReconcileOutcome) -> Result<()> {
    match outcome {
        ReconcileOutcome::NoOp => {
            println!("{}", style("Nothing to do").dim());
            Ok(())
        }
        ReconcileOutcome::Committed { change } => {
            println!("{} {}", style("✓").green(), serde_json::to_string(change)?);
            Ok(())
        }
        ReconcileOutcome::RolledBack { reason, .. } => {
            anyhow::bail!("Change rolled back: {}", reason)
        }
    }
}

pub fn print_board(columns: &[Column]) {
    if columns.is_empty() {
        println!("{}", style("No columns yet").dim());
        return;
    }
    for column in columns {
        println!(
            "{} {} {}",
            style(&column.title).bold().cyan(),
            style(format!("[{}]", column.id)).dim(),
            style(format!("({})", column.cards.len())).dim()
        );
        for card in &column.cards {
            println!("  • {} {}", card.person_name, style(&card.person_id).dim());
        }
    }
}
