//! Contact commands: `netboard people`.

use anyhow::Result;
use board_common::wire::CreatePersonRequest;
use console::style;
use network_board::config::BoardToml;

use super::super::PeopleCommands;
use super::open_board;

pub async fn cmd_people(config: &BoardToml, command: Option<PeopleCommands>) -> Result<()> {
    let mut reconciler = open_board(config).await?;

    match command {
        None | Some(PeopleCommands::List) => {
            if reconciler.people().is_empty() {
                println!("No contacts yet.");
                return Ok(());
            }
            for person in reconciler.people() {
                let columns = reconciler.board().columns_containing(&person.id);
                println!(
                    "{} {:<24} {} {}",
                    if person.starred {
                        style("★").yellow().to_string()
                    } else {
                        " ".to_string()
                    },
                    person.name,
                    style(&person.id).dim(),
                    if columns.is_empty() {
                        style("unplaced".to_string()).dim()
                    } else {
                        style(columns.join(", ")).cyan()
                    }
                );
            }
        }
        Some(PeopleCommands::Add {
            name,
            email,
            phone,
            category,
            starred,
        }) => {
            let request = CreatePersonRequest {
                name,
                email,
                phone,
                starred,
                category,
                address: None,
            };
            let person = reconciler.create_person(&request).await?;
            println!("Created {} ({})", person.name, person.id);
        }
        Some(PeopleCommands::Remove { id }) => {
            if let Err(err) = reconciler.delete_person(&id).await {
                eprintln!("{} {}", style("Error:").red().bold(), err);
                return Err(err.into());
            }
            println!("Deleted {}", id);
        }
    }

    Ok(())
}
