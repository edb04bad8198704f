//! Configuration for the network board.
//!
//! Settings are read from `.netboard/board.toml` and layered:
//! file → environment → CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! port = 3142
//! db_path = ".netboard/board.db"
//! dev_mode = false
//! # auth_token = "secret"
//!
//! [client]
//! base_url = "http://127.0.0.1:3142"
//! timeout_secs = 10
//! poll_interval_secs = 3
//! # token = "secret"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory holding the config file and the default database.
pub const CONFIG_DIR: &str = ".netboard";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "board.toml";

/// REST server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Bind on all interfaces and allow any origin
    #[serde(default)]
    pub dev_mode: bool,
    /// When set, `/api/*` requests must carry `Authorization: Bearer <token>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

fn default_port() -> u16 {
    3142
}

fn default_db_path() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("board.db")
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            db_path: default_db_path(),
            dev_mode: false,
            auth_token: None,
        }
    }
}

impl ServerSection {
    /// `db_path` resolved against the project directory when relative.
    pub fn db_path_in(&self, project_dir: &Path) -> PathBuf {
        if self.db_path.is_absolute() {
            self.db_path.clone()
        } else {
            project_dir.join(&self.db_path)
        }
    }
}

/// Client (CLI and poller) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    format!("http://127.0.0.1:{}", default_port())
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_poll_interval_secs() -> u64 {
    3
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            token: None,
        }
    }
}

impl ClientSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Poll interval, never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// The complete board.toml configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
}

impl BoardToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse board.toml")
    }

    /// Load `<project_dir>/.netboard/board.toml`, or defaults if it does not exist.
    pub fn load_or_default(project_dir: &Path) -> Result<Self> {
        let config_path = Self::path_in(project_dir);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize board.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn path_in(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Apply `NETBOARD_*` environment overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the process env in production).
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("NETBOARD_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid NETBOARD_PORT '{}'", port))?;
        }
        if let Some(db_path) = lookup("NETBOARD_DB_PATH") {
            self.server.db_path = PathBuf::from(db_path);
        }
        if let Some(token) = lookup("NETBOARD_AUTH_TOKEN").filter(|t| !t.is_empty()) {
            self.server.auth_token = Some(token);
        }
        if let Some(base_url) = lookup("NETBOARD_BASE_URL") {
            self.client.base_url = base_url;
        }
        if let Some(token) = lookup("NETBOARD_TOKEN").filter(|t| !t.is_empty()) {
            self.client.token = Some(token);
        }
        Ok(())
    }

    /// Validate the configuration, returning human-readable problems.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.server.port == 0 {
            problems.push("server.port must be non-zero".to_string());
        }
        if !(self.client.base_url.starts_with("http://")
            || self.client.base_url.starts_with("https://"))
        {
            problems.push(format!(
                "client.base_url '{}' must start with http:// or https://",
                self.client.base_url
            ));
        }
        if self.client.timeout_secs == 0 {
            problems.push("client.timeout_secs must be non-zero".to_string());
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BoardToml::default();
        assert_eq!(config.server.port, 3142);
        assert_eq!(config.server.db_path, PathBuf::from(".netboard/board.db"));
        assert!(!config.server.dev_mode);
        assert!(config.server.auth_token.is_none());
        assert_eq!(config.client.base_url, "http://127.0.0.1:3142");
        assert_eq!(config.client.poll_interval(), Duration::from_secs(3));
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let content = r#"
[server]
port = 8080

[client]
poll_interval_secs = 5
"#;
        let config = BoardToml::parse(content).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.db_path, PathBuf::from(".netboard/board.db"));
        assert_eq!(config.client.poll_interval_secs, 5);
        assert_eq!(config.client.timeout_secs, 10);
    }

    #[test]
    fn test_db_path_in_resolves_relative_paths() {
        let mut server = ServerSection::default();
        assert_eq!(
            server.db_path_in(Path::new("/work")),
            PathBuf::from("/work/.netboard/board.db")
        );
        server.db_path = PathBuf::from("/var/lib/board.db");
        assert_eq!(
            server.db_path_in(Path::new("/work")),
            PathBuf::from("/var/lib/board.db")
        );
    }

    #[test]
    fn test_parse_malformed_is_error() {
        let err = BoardToml::parse("[server\nport = ").unwrap_err();
        assert!(err.to_string().contains("board.toml"));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = BoardToml::load_or_default(dir.path()).unwrap();
        assert_eq!(config.server.port, 3142);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        let mut config = BoardToml::default();
        config.server.port = 9000;
        config.client.token = Some("secret".into());
        config.save(&BoardToml::path_in(dir.path())).unwrap();

        let loaded = BoardToml::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.client.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("NETBOARD_PORT", "4000"),
            ("NETBOARD_BASE_URL", "http://board.local:4000"),
            ("NETBOARD_TOKEN", "abc"),
            ("NETBOARD_AUTH_TOKEN", ""),
        ]
        .into_iter()
        .collect();
        let mut config = BoardToml::default();
        config
            .apply_env_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.client.base_url, "http://board.local:4000");
        assert_eq!(config.client.token.as_deref(), Some("abc"));
        assert!(config.server.auth_token.is_none());
    }

    #[test]
    fn test_env_invalid_port_is_error() {
        let mut config = BoardToml::default();
        let err = config
            .apply_env_with(|key| (key == "NETBOARD_PORT").then(|| "nope".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("NETBOARD_PORT"));
    }

    #[test]
    fn test_validate() {
        assert!(BoardToml::default().validate().is_empty());

        let mut config = BoardToml::default();
        config.client.base_url = "board.local".into();
        config.client.timeout_secs = 0;
        let problems = config.validate();
        assert_eq!(problems.len(), 2);
    }
}
