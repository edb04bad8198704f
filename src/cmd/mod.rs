//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module    | Commands handled                  |
//! |-----------|-----------------------------------|
//! | `init`    | `Init`                            |
//! | `serve`   | `Serve`                           |
//! | `board`   | `Board` (`show`, `add`, `move`, `watch`) |
//! | `columns` | `Columns`                         |
//! | `people`  | `People`                          |
//! | `replay`  | `Replay`                          |

pub mod board;
pub mod columns;
pub mod init;
pub mod people;
pub mod replay;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use network_board::board::{HttpBoardClient, Reconciler};
use network_board::config::BoardToml;

pub use board::cmd_board;
pub use columns::cmd_columns;
pub use init::cmd_init;
pub use people::cmd_people;
pub use replay::cmd_replay;
pub use serve::cmd_serve;

/// board.toml, then `NETBOARD_*` env, then `--base-url`.
pub fn load_config(project_dir: &Path, base_url: Option<&str>) -> Result<BoardToml> {
    let mut config = BoardToml::load_or_default(project_dir)?;
    config.apply_env()?;
    if let Some(url) = base_url {
        config.client.base_url = url.to_string();
    }
    let problems = config.validate();
    if !problems.is_empty() {
        anyhow::bail!("Invalid configuration:\n  {}", problems.join("\n  "));
    }
    Ok(config)
}

pub fn http_client(config: &BoardToml) -> Result<Arc<HttpBoardClient>> {
    let client = HttpBoardClient::new(
        &config.client.base_url,
        config.client.timeout(),
        config.client.token.clone(),
    )?;
    Ok(Arc::new(client))
}

/// Connect to the server and hydrate the board.
pub async fn open_board(config: &BoardToml) -> Result<Reconciler> {
    let client = http_client(config)?;
    Reconciler::load(client.clone(), client)
        .await
        .with_context(|| format!("Failed to load board from {}", config.client.base_url))
}
