use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "netboard")]
#[command(version, about = "Kanban board of contacts, kept in sync with a REST assignment store")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Board server URL. Overrides board.toml and NETBOARD_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create .netboard/board.toml and the board database
    Init,
    /// Run the board REST server
    Serve {
        /// Port to serve on
        #[arg(short, long)]
        port: Option<u16>,

        /// Database path
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Enable dev mode (bind 0.0.0.0, permissive CORS)
        #[arg(long)]
        dev: bool,
    },
    /// Show and edit card placement
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },
    /// List or edit the board's columns
    Columns {
        #[command(subcommand)]
        command: Option<ColumnsCommands>,
    },
    /// List, create or delete contacts
    People {
        #[command(subcommand)]
        command: Option<PeopleCommands>,
    },
    /// Replay a JSON array of drag intents against the live board
    Replay {
        /// Path to the intents file
        file: PathBuf,
    },
}

#[derive(Subcommand, Clone)]
pub enum BoardCommands {
    /// Print every column with its cards
    Show,
    /// Place a person in a column
    Add { person_id: String, column_id: String },
    /// Move a person's card between columns
    Move {
        person_id: String,
        from: String,
        to: String,
    },
    /// Print the board whenever it changes, until Ctrl+C
    Watch {
        /// Poll interval in seconds (defaults to client.poll_interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ColumnsCommands {
    /// List columns in board order
    List,
    /// Append a column
    Add { title: String },
    /// Change a column's title (its id stays the same)
    Rename { id: String, title: String },
    /// Move a column to a new position (0-based)
    Reorder { id: String, index: usize },
    /// Delete a column and every assignment in it
    Remove {
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum PeopleCommands {
    /// List contacts and the columns they are in
    List,
    /// Create a contact
    Add {
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        starred: bool,
    },
    /// Delete a contact and their assignments
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    network_board::logging::init_tracing(cli.verbose, cli.log_json);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Init => cmd::cmd_init(&project_dir)?,
        Commands::Serve { port, db_path, dev } => {
            let config = cmd::load_config(&project_dir, cli.base_url.as_deref())?;
            cmd::cmd_serve(&project_dir, config, *port, db_path.clone(), *dev).await?;
        }
        Commands::Board { command } => {
            let config = cmd::load_config(&project_dir, cli.base_url.as_deref())?;
            cmd::cmd_board(&config, command.clone()).await?;
        }
        Commands::Columns { command } => {
            let config = cmd::load_config(&project_dir, cli.base_url.as_deref())?;
            cmd::cmd_columns(&config, command.clone()).await?;
        }
        Commands::People { command } => {
            let config = cmd::load_config(&project_dir, cli.base_url.as_deref())?;
            cmd::cmd_people(&config, command.clone()).await?;
        }
        Commands::Replay { file } => {
            let config = cmd::load_config(&project_dir, cli.base_url.as_deref())?;
            cmd::cmd_replay(&config, file).await?;
        }
    }

    Ok(())
}
