//! Client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ballot_types::{Candidate, CandidateRegistry};
use ballot_utils::LogFormat;

use crate::ConfigError;

/// Configuration for the ballot client.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base directory for local state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Vote collection directory. Defaults to `<data_dir>/votes`.
    #[serde(default)]
    pub votes_dir: Option<PathBuf>,

    /// Installation-local flag directory. Defaults to `<data_dir>/local`.
    #[serde(default)]
    pub local_dir: Option<PathBuf>,

    /// How often live results re-read the collection for votes from other
    /// processes, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// LMDB map size per environment, in MiB.
    #[serde(default = "default_map_size_mib")]
    pub map_size_mib: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Use ANSI true colour when rendering charts.
    #[serde(default = "default_true")]
    pub color: bool,

    /// Replaces the built-in candidate registry when non-empty.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./ballot_data")
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_map_size_mib() -> usize {
    64
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn votes_path(&self) -> PathBuf {
        self.votes_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("votes"))
    }

    pub fn local_path(&self) -> PathBuf {
        self.local_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("local"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mib.max(1) * 1024 * 1024
    }

    /// The configured registry, or the built-in one.
    pub fn registry(&self) -> Result<CandidateRegistry, ConfigError> {
        if self.candidates.is_empty() {
            Ok(CandidateRegistry::builtin())
        } else {
            Ok(CandidateRegistry::from_candidates(self.candidates.clone())?)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            votes_dir: None,
            local_dir: None,
            poll_interval_ms: default_poll_interval_ms(),
            map_size_mib: default_map_size_mib(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            color: default_true(),
            candidates: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_types::Role;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ClientConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = ClientConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.poll_interval_ms, config.poll_interval_ms);
        assert_eq!(parsed.data_dir, config.data_dir);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ClientConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.log_format, LogFormat::Human);
        assert!(config.color);
        assert_eq!(config.votes_path(), PathBuf::from("./ballot_data/votes"));
        assert_eq!(config.local_path(), PathBuf::from("./ballot_data/local"));
        assert_eq!(config.registry().unwrap(), CandidateRegistry::builtin());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            data_dir = "/tmp/poll"
            local_dir = "/home/me/.ballot"
            poll_interval_ms = 2000
            log_format = "json"
        "#;
        let config = ClientConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.votes_path(), PathBuf::from("/tmp/poll/votes"));
        assert_eq!(config.local_path(), PathBuf::from("/home/me/.ballot"));
        assert_eq!(config.log_level, "warn"); // default
    }

    #[test]
    fn candidates_replace_builtin_registry() {
        let toml = r#"
            [[candidates]]
            id = "a"
            number = 1
            name = "Alice"
            role = "president"

            [[candidates]]
            id = "b"
            number = 1
            name = "Bob"
            role = "vice_president"
        "#;
        let config = ClientConfig::from_toml_str(toml).unwrap();
        let registry = config.registry().unwrap();
        assert_eq!(registry.candidates(Role::President).len(), 1);
        assert_eq!(registry.candidates(Role::VicePresident)[0].name, "Bob");
    }

    #[test]
    fn invalid_registry_is_reported() {
        let toml = r#"
            [[candidates]]
            id = "a"
            number = 1
            name = "Alice"
            role = "president"
        "#;
        let config = ClientConfig::from_toml_str(toml).unwrap();
        assert!(matches!(config.registry(), Err(ConfigError::Registry(_))));
    }

    #[test]
    fn missing_file_returns_io_error() {
        let result = ClientConfig::from_toml_file(Path::new("/nonexistent/ballot.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballot.toml");
        let mut config = ClientConfig::default();
        config.color = false;
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        let loaded = ClientConfig::from_toml_file(&path).unwrap();
        assert!(!loaded.color);
    }
}
