use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::http::DEFAULT_USER_AGENT;

/// What to do with URLs whose connection attempt failed outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionFailurePolicy {
    /// Record them in the failure report with the connection-error marker.
    #[default]
    Report,
    /// Log a warning only; the line appears in neither successes nor failures.
    Ignore,
}

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    /// `time;target;file;line;level;"message"`, for loading into a spreadsheet.
    Csv,
}

/// `[log]` section of config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set (e.g. "info", "imgdl_core=debug").
    pub level: String,
    /// Layout of stderr lines.
    pub format: LogFormat,
    /// Layout of log file lines.
    pub file_format: LogFormat,
    /// Write log lines to stderr.
    pub console: bool,
    /// Write log lines to a file as well.
    pub file_logging: bool,
    /// Log file path; defaults to `$XDG_STATE_HOME/imgdl/imgdl.log`.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            file_format: LogFormat::Csv,
            console: true,
            file_logging: true,
            file: None,
        }
    }
}

/// Global configuration loaded from `~/.config/imgdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImgdlConfig {
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Receive buffer size in bytes; bounds the size of each body chunk.
    pub buffer_size: usize,
    pub connect_timeout_secs: u64,
    /// Total time allowed for one request, body included. Unset means no cap.
    pub timeout_secs: Option<u64>,
    /// Bytes per second below which a transfer counts as stalled.
    pub low_speed_limit: u32,
    /// How long a transfer may stay below `low_speed_limit` before it is aborted.
    pub low_speed_time_secs: u64,
    pub max_redirects: u32,
    /// Number of fetch threads. 1 means strictly sequential.
    pub workers: usize,
    pub connection_failures: ConnectionFailurePolicy,
    pub log: LogConfig,
}

impl Default for ImgdlConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            buffer_size: 16 * 1024,
            connect_timeout_secs: 15,
            timeout_secs: None,
            low_speed_limit: 1,
            low_speed_time_secs: 60,
            max_redirects: 10,
            workers: 1,
            connection_failures: ConnectionFailurePolicy::Report,
            log: LogConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImgdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path. The file must exist.
pub fn load_from_path(path: &Path) -> Result<ImgdlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: ImgdlConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    if cfg.workers == 0 {
        anyhow::bail!("{}: workers must be at least 1", path.display());
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ImgdlConfig::default();
        assert_eq!(cfg.user_agent, "Mozilla/5.0");
        assert_eq!(cfg.workers, 1);
        assert_eq!(cfg.connection_failures, ConnectionFailurePolicy::Report);
        assert_eq!(cfg.log.level, "info");
        assert!(cfg.log.console);
        assert_eq!(cfg.log.format, LogFormat::Full);
        assert_eq!(cfg.log.file_format, LogFormat::Csv);
        assert!(cfg.log.file.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ImgdlConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ImgdlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.user_agent, cfg.user_agent);
        assert_eq!(parsed.buffer_size, cfg.buffer_size);
        assert_eq!(parsed.timeout_secs, cfg.timeout_secs);
        assert_eq!(parsed.log.format, cfg.log.format);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"
            workers = 4
            connection_failures = "ignore"
        "#;
        let cfg: ImgdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.connection_failures, ConnectionFailurePolicy::Ignore);
        assert_eq!(cfg.max_redirects, 10);
        assert_eq!(cfg.timeout_secs, None);
        assert_eq!(cfg.low_speed_time_secs, 60);
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn config_toml_total_timeout_is_opt_in() {
        let cfg: ImgdlConfig = toml::from_str("timeout_secs = 120\nlow_speed_limit = 256\n").unwrap();
        assert_eq!(cfg.timeout_secs, Some(120));
        assert_eq!(cfg.low_speed_limit, 256);
    }

    #[test]
    fn config_toml_log_section() {
        let toml = r#"
            user_agent = "Mozilla/5.0 (X11; Linux x86_64)"

            [log]
            level = "debug"
            format = "compact"
            file_format = "full"
            console = false
            file = "/tmp/imgdl-test.log"
        "#;
        let cfg: ImgdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.user_agent, "Mozilla/5.0 (X11; Linux x86_64)");
        assert_eq!(cfg.log.level, "debug");
        assert_eq!(cfg.log.format, LogFormat::Compact);
        assert_eq!(cfg.log.file_format, LogFormat::Full);
        assert!(!cfg.log.console);
        assert!(cfg.log.file_logging);
        assert_eq!(cfg.log.file.as_deref(), Some(Path::new("/tmp/imgdl-test.log")));
    }

    #[test]
    fn load_from_path_rejects_zero_workers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "workers = 0\n").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("workers"));
    }

    #[test]
    fn load_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_err());
    }
}
