//! Project initialization: `netboard init`.

use anyhow::{Context, Result};
use network_board::config::{BoardToml, CONFIG_DIR};
use network_board::service::BoardDb;

pub fn cmd_init(project_dir: &std::path::Path) -> Result<()> {
    let config_dir = project_dir.join(CONFIG_DIR);
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let config_path = BoardToml::path_in(project_dir);
    let config = if config_path.exists() {
        println!("Config already present at {}", config_path.display());
        BoardToml::load(&config_path)?
    } else {
        let config = BoardToml::default();
        config.save(&config_path)?;
        println!("Wrote {}", config_path.display());
        config
    };

    let db_path = config.server.db_path_in(project_dir);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    BoardDb::new(&db_path)?;
    println!("Board database ready at {}", db_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Run `netboard serve` to start the board server");
    println!("  2. Run `netboard columns add <title>` to create columns");
    println!("  3. Run `netboard people add <name>` and `netboard board add <person> <column>`");

    Ok(())
}
