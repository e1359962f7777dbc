//! Gate configuration
//!
//! Settings for both run modes, loadable from a gate.yaml file:
//!
//! ```yaml
//! owner: sarmad-abualkaz
//! repo: test-repo
//! workflow_file: cron_and_dispatch.yml
//! branch: main
//! history_window: 20
//! poll_interval_secs: 10
//! settle_secs: 60
//! ```
//!
//! Every setting can also be given as a command-line flag; flags win
//! over the file, the file wins over built-in defaults. `owner`, `repo`
//! and `workflow_file` have no defaults and must come from one of the
//! two sources.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::github::runs::{HistoryQuery, RepoRef};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error in {file}: {error}")]
    Yaml {
        file: String,
        error: serde_yaml::Error,
    },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Repository owner (user or organization).
    pub owner: Option<String>,

    /// Repository name.
    pub repo: Option<String>,

    /// Workflow file name as it appears under `.github/workflows/`.
    pub workflow_file: Option<String>,

    /// Branch whose run history is consulted.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// How many recent runs to request; histories shorter than this are
    /// decided on with a warning.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Seconds between status checks while a predecessor is active.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Seconds that must pass after a predecessor's last update.
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,

    /// Cap, in seconds, on the total should-complete wait. Absent means
    /// the wait is unbounded.
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_history_window() -> usize {
    20
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_settle_secs() -> u64 {
    60
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            workflow_file: None,
            branch: default_branch(),
            history_window: default_history_window(),
            poll_interval_secs: default_poll_interval_secs(),
            settle_secs: default_settle_secs(),
            deadline_secs: None,
        }
    }
}

impl GateConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: GateConfig = serde_yaml::from_str(&content).map_err(|e| ConfigError::Yaml {
            file: path.display().to_string(),
            error: e,
        })?;
        Ok(config)
    }

    pub fn owner(&self) -> Result<&str, ConfigError> {
        self.owner.as_deref().ok_or(ConfigError::Missing("owner"))
    }

    pub fn repo(&self) -> Result<&str, ConfigError> {
        self.repo.as_deref().ok_or(ConfigError::Missing("repo"))
    }

    pub fn workflow_file(&self) -> Result<&str, ConfigError> {
        self.workflow_file
            .as_deref()
            .ok_or(ConfigError::Missing("workflow-file"))
    }

    pub fn repo_ref(&self) -> Result<RepoRef, ConfigError> {
        Ok(RepoRef::new(self.owner()?, self.repo()?))
    }

    pub fn history_query(&self) -> Result<HistoryQuery, ConfigError> {
        Ok(HistoryQuery {
            workflow_file: self.workflow_file()?.to_string(),
            branch: self.branch.clone(),
            per_page: self.history_window,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn settle_duration(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();
        assert_eq!(config.branch, "main");
        assert_eq!(config.history_window, 20);
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.settle_duration(), Duration::from_secs(60));
        assert_eq!(config.deadline(), None);
        assert!(config.owner.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
owner: sarmad-abualkaz
repo: test-repo
workflow_file: cron_and_dispatch.yml
branch: release
history_window: 50
deadline_secs: 900
"#;
        let config: GateConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.owner().unwrap(), "sarmad-abualkaz");
        assert_eq!(config.repo().unwrap(), "test-repo");
        assert_eq!(config.workflow_file().unwrap(), "cron_and_dispatch.yml");
        assert_eq!(config.branch, "release");
        assert_eq!(config.history_window, 50);
        assert_eq!(config.deadline(), Some(Duration::from_secs(900)));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
owner: sarmad-abualkaz
repo: test-repo
workflow_file: cron_and_dispatch.yml
"#;
        let config: GateConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.branch, "main");
        assert_eq!(config.history_window, 20);
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.settle_secs, 60);
        assert_eq!(config.deadline_secs, None);
    }

    #[test]
    fn test_missing_required_settings() {
        let config = GateConfig::default();
        assert!(matches!(config.owner(), Err(ConfigError::Missing("owner"))));
        assert!(matches!(config.repo(), Err(ConfigError::Missing("repo"))));
        assert!(matches!(
            config.workflow_file(),
            Err(ConfigError::Missing("workflow-file"))
        ));
        assert!(config.repo_ref().is_err());
        assert!(config.history_query().is_err());
    }

    #[test]
    fn test_repo_ref_and_history_query() {
        let config = GateConfig {
            owner: Some("sarmad-abualkaz".to_string()),
            repo: Some("test-repo".to_string()),
            workflow_file: Some("cron_and_dispatch.yml".to_string()),
            ..GateConfig::default()
        };

        let repo = config.repo_ref().unwrap();
        assert_eq!(repo.owner, "sarmad-abualkaz");
        assert_eq!(repo.repo, "test-repo");

        let query = config.history_query().unwrap();
        assert_eq!(query.workflow_file, "cron_and_dispatch.yml");
        assert_eq!(query.branch, "main");
        assert_eq!(query.per_page, 20);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gate.yaml");
        std::fs::write(
            &path,
            r#"
owner: sarmad-abualkaz
repo: test-repo
workflow_file: cron_and_dispatch.yml
settle_secs: 120
"#,
        )
        .unwrap();

        let config = GateConfig::load(&path).unwrap();
        assert_eq!(config.settle_duration(), Duration::from_secs(120));
        assert_eq!(config.owner().unwrap(), "sarmad-abualkaz");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = GateConfig::load("/nonexistent/gate.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_invalid_yaml_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gate.yaml");
        std::fs::write(&path, "owner: [unclosed").unwrap();

        let err = GateConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("gate.yaml"));
    }
}
