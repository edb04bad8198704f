//! Column editing commands: `netboard columns`.

use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use network_board::config::BoardToml;

use super::super::ColumnsCommands;
use super::open_board;

pub async fn cmd_columns(config: &BoardToml, command: Option<ColumnsCommands>) -> Result<()> {
    let mut reconciler = open_board(config).await?;

    match command {
        None | Some(ColumnsCommands::List) => {
            if reconciler.columns().is_empty() {
                println!("No columns yet. Add one with `netboard columns add <title>`.");
                return Ok(());
            }
            for (index, column) in reconciler.columns().iter().enumerate() {
                println!(
                    "{:>3}  {:<24} {} {}",
                    index,
                    column.title,
                    style(&column.id).dim(),
                    style(format!("({} cards)", column.cards.len())).dim()
                );
            }
        }
        Some(ColumnsCommands::Add { title }) => {
            let id = reconciler.add_column(&title).await?;
            println!("Added column '{}' ({})", title, id);
        }
        Some(ColumnsCommands::Rename { id, title }) => {
            reconciler.rename_column(&id, &title).await?;
            println!("Renamed column {} to '{}'", id, title);
        }
        Some(ColumnsCommands::Reorder { id, index }) => {
            reconciler.reorder_column(&id, index).await?;
            println!("Moved column {}", id);
        }
        Some(ColumnsCommands::Remove { id, yes }) => {
            let cards = match reconciler.board().column(&id) {
                Some(column) => column.cards.len(),
                None => anyhow::bail!("Unknown column: {}", id),
            };

            if !yes {
                let confirm = Confirm::new()
                    .with_prompt(format!(
                        "Delete column '{}' and its {} assignment(s)?",
                        id, cards
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirm {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }

            let deletion = reconciler.delete_column(&id).await?;
            match deletion.user_message() {
                Some(message) => {
                    eprintln!("{} {}", style("Error:").red().bold(), message);
                    eprintln!(
                        "  {} of {} assignment deletions failed{}",
                        deletion.failed,
                        deletion.attempted,
                        if deletion.titles_saved {
                            ""
                        } else {
                            "; column list not saved"
                        }
                    );
                }
                None => println!(
                    "Deleted column '{}' and {} assignment(s)",
                    deletion.column.title, deletion.attempted
                ),
            }
        }
    }

    Ok(())
}
