//! Board REST server command: `netboard serve`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use network_board::config::BoardToml;
use network_board::service::{ServerConfig, start_server};

pub async fn cmd_serve(
    project_dir: &Path,
    mut config: BoardToml,
    port: Option<u16>,
    db_path: Option<PathBuf>,
    dev: bool,
) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(db_path) = db_path {
        config.server.db_path = db_path;
    }
    if dev {
        config.server.dev_mode = true;
    }

    let mut server = ServerConfig::from(&config.server);
    server.db_path = config.server.db_path_in(project_dir);
    start_server(server).await?;
    Ok(())
}
