//! Server configuration from command-line flags and environment.

use clap::Parser;
use recordkeep_core::default_log_level;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "recordkeep", version, about = "Record management REST service")]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "RECORDKEEP_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// SQLite database file, created when missing
    #[arg(long, env = "RECORDKEEP_DB_PATH", default_value = "recordkeep.sqlite3")]
    pub db_path: PathBuf,

    /// Keep records in memory only; `--db-path` is ignored
    #[arg(long, env = "RECORDKEEP_IN_MEMORY")]
    pub in_memory: bool,

    /// trace|debug|info|warn|error (defaults to debug in debug builds, info otherwise)
    #[arg(long, env = "RECORDKEEP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; logs go to stderr when unset
    #[arg(long, env = "RECORDKEEP_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl Config {
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use clap::Parser;

    #[test]
    fn explicit_flags_override_defaults() {
        let config = Config::try_parse_from([
            "recordkeep",
            "--bind",
            "0.0.0.0:8080",
            "--db-path",
            "/tmp/records.db",
            "--in-memory",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.db_path.to_str(), Some("/tmp/records.db"));
        assert!(config.in_memory);
        assert_eq!(config.effective_log_level(), "warn");
    }

    #[test]
    fn rejects_unparseable_bind_address() {
        assert!(Config::try_parse_from(["recordkeep", "--bind", "nowhere"]).is_err());
    }
}
