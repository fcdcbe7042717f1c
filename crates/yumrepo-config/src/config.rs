use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::debug;
use yumrepo_utils::{
    path::{home_dir, resolve_path, xdg_config_home},
    time::parse_duration,
};

use crate::error::{ConfigError, Result};

/// Environment variable pointing at an alternative configuration file.
pub const CONFIG_ENV: &str = "YUMREPO_CONFIG";

/// Environment variable overriding the home directory handed to the query tool.
pub const HOME_ENV: &str = "YUMREPO_HOME";

/// Environment variable overriding the query tool's scratch directory base.
pub const TMPDIR_ENV: &str = "YUMREPO_TMPDIR";

pub const DEFAULT_REPOQUERY_COMMAND: &str = "repoquery";

/// Application's configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Executable used to query repositories.
    /// Default: repoquery
    pub repoquery_command: Option<String>,

    /// Home directory exported to the query tool.
    /// Default: $YUMREPO_HOME, then $HOME, then the OS temp directory
    pub home: Option<String>,

    /// Base directory for the query tool's own cache.
    /// Default: $YUMREPO_TMPDIR, then <home>/.yumrepo/tmp
    pub tmpdir: Option<String>,

    /// Global timeout for repository metadata requests (e.g. "30s", "2m").
    /// Default: no timeout
    pub http_timeout: Option<String>,

    /// User agent sent with repository metadata requests.
    /// Default: yumrepo/<version>
    pub user_agent: Option<String>,

    /// Proxy used for repository metadata requests.
    pub proxy: Option<String>,
}

/// Returns the configuration file location.
///
/// `$YUMREPO_CONFIG` wins when set, otherwise `$XDG_CONFIG_HOME/yumrepo/config.toml`.
pub fn config_path() -> PathBuf {
    match non_empty_env(CONFIG_ENV) {
        Some(path) => PathBuf::from(path),
        None => xdg_config_home().join("yumrepo").join("config.toml"),
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    /// Loads the configuration from [`config_path`].
    pub fn new() -> Result<Self> {
        Self::load(&config_path())
    }

    /// Loads the configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("config file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::ReadError {
                    path: path.display().to_string(),
                    source: err,
                });
            }
        };

        let config: Config = toml::from_str(&content)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn repoquery_command(&self) -> &str {
        self.repoquery_command
            .as_deref()
            .filter(|cmd| !cmd.trim().is_empty())
            .unwrap_or(DEFAULT_REPOQUERY_COMMAND)
    }

    /// Home directory for the query tool.
    pub fn query_home(&self) -> Result<PathBuf> {
        if let Some(home) = non_empty_env(HOME_ENV) {
            return Ok(resolve_path(&home)?);
        }
        match self.home.as_deref().filter(|h| !h.trim().is_empty()) {
            Some(home) => Ok(resolve_path(home)?),
            None => Ok(home_dir()),
        }
    }

    /// Base scratch directory for the query tool; each repository gets its
    /// own subdirectory below it.
    pub fn query_tmpdir(&self) -> Result<PathBuf> {
        if let Some(tmpdir) = non_empty_env(TMPDIR_ENV) {
            return Ok(resolve_path(&tmpdir)?);
        }
        match self.tmpdir.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(tmpdir) => Ok(resolve_path(tmpdir)?),
            None => Ok(self.query_home()?.join(".yumrepo").join("tmp")),
        }
    }

    pub fn http_timeout(&self) -> Result<Option<Duration>> {
        match self.http_timeout.as_deref() {
            Some(value) => Ok(Some(parse_duration(value)?)),
            None => Ok(None),
        }
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("yumrepo/{}", env!("CARGO_PKG_VERSION")))
    }
}
