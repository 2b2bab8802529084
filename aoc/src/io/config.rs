//! User-scoped configuration stored in `{config_dir}/aoc/config.toml`.
//!
//! The store is a flat key/value table written only by `aoc init`. Every
//! other command loads it once into an [`EnvironmentConfig`] and passes that
//! by reference.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::core::error::ConfigError;

/// Overrides the directory holding `config.toml` (used by tests and CI).
pub const CONFIG_DIR_ENV: &str = "AOC_CONFIG_DIR";
pub const DEFAULT_BRANCH: &str = "master";
/// Hex prefix every session cookie starts with.
pub const SESSION_PREFIX: &str = "53616c7465645f5f";
pub const SESSION_LEN: usize = 128;

/// Keys understood by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    SessionCookie,
    GitDefaultBranch,
    NoGit,
    SilentOutput,
}

impl ConfigKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionCookie => "session_cookie",
            Self::GitDefaultBranch => "git_default_branch",
            Self::NoGit => "no_git",
            Self::SilentOutput => "silent_output",
        }
    }
}

/// Persisted key/value storage.
pub trait ConfigStore {
    fn get(&self, key: ConfigKey) -> Option<String>;

    /// Store `value`; returns `Ok(false)` without writing when it is empty or unchanged.
    fn try_set(&mut self, key: ConfigKey, value: &str) -> Result<bool>;
}

/// [`ConfigStore`] backed by a TOML file.
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlConfigStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = values.len(), "config store opened");
        Ok(Self { path, values })
    }

    /// Open the store at its default user-scoped location.
    pub fn open_default() -> Result<Self> {
        Self::open(default_config_path()?)
    }
}

impl ConfigStore for TomlConfigStore {
    fn get(&self, key: ConfigKey) -> Option<String> {
        self.values
            .get(key.as_str())
            .filter(|value| !value.is_empty())
            .cloned()
    }

    fn try_set(&mut self, key: ConfigKey, value: &str) -> Result<bool> {
        let value = value.trim();
        if value.is_empty() || self.get(key).as_deref() == Some(value) {
            return Ok(false);
        }
        self.values
            .insert(key.as_str().to_string(), value.to_string());
        let mut buf = toml::to_string_pretty(&self.values).context("serialize config toml")?;
        buf.push('\n');
        write_atomic(&self.path, &buf)?;
        debug!(key = key.as_str(), "config value stored");
        Ok(true)
    }
}

/// `$AOC_CONFIG_DIR/config.toml`, else `{platform config dir}/aoc/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()
            .ok_or_else(|| anyhow!("could not determine the user config directory"))?
            .join("aoc"),
    };
    Ok(dir.join("config.toml"))
}

/// Process-wide configuration resolved once per invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub session_cookie: String,
    pub git_default_branch: String,
    pub no_git: bool,
    pub silent_output: bool,
}

impl std::fmt::Debug for EnvironmentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentConfig")
            .field("session_cookie", &mask_session(&self.session_cookie))
            .field("git_default_branch", &self.git_default_branch)
            .field("no_git", &self.no_git)
            .field("silent_output", &self.silent_output)
            .finish()
    }
}

impl EnvironmentConfig {
    pub fn load(store: &dyn ConfigStore) -> Result<Self, ConfigError> {
        let session_cookie = store
            .get(ConfigKey::SessionCookie)
            .ok_or(ConfigError::SessionMissing)?;
        Ok(Self {
            session_cookie,
            git_default_branch: store
                .get(ConfigKey::GitDefaultBranch)
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            no_git: read_flag(store, ConfigKey::NoGit)?,
            silent_output: read_flag(store, ConfigKey::SilentOutput)?,
        })
    }
}

fn read_flag(store: &dyn ConfigStore, key: ConfigKey) -> Result<bool, ConfigError> {
    match store.get(key) {
        None => Ok(false),
        Some(value) => parse_flag(key, &value),
    }
}

pub fn parse_flag(key: ConfigKey, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key: key.as_str(),
            value: value.to_string(),
        }),
    }
}

/// Sanity check of the session token shape; not a cryptographic verification.
pub fn validate_session(session: &str) -> Result<(), ConfigError> {
    if session.len() == SESSION_LEN && session.starts_with(SESSION_PREFIX) {
        Ok(())
    } else {
        Err(ConfigError::InvalidSession {
            expected_prefix: SESSION_PREFIX,
        })
    }
}

/// `abcd...wxyz` rendering of a secret.
pub fn mask_session(session: &str) -> String {
    let chars: Vec<char> = session.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::valid_session;

    #[test]
    fn missing_file_is_empty_store() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = TomlConfigStore::open(temp.path().join("missing.toml")).expect("open");
        assert_eq!(store.get(ConfigKey::SessionCookie), None);
    }

    #[test]
    fn try_set_persists_and_skips_unchanged() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("config.toml");
        let mut store = TomlConfigStore::open(&path).expect("open");

        assert!(store.try_set(ConfigKey::GitDefaultBranch, "main").expect("set"));
        assert!(!store.try_set(ConfigKey::GitDefaultBranch, "main").expect("set again"));
        assert!(!store.try_set(ConfigKey::GitDefaultBranch, "  ").expect("set empty"));

        let reopened = TomlConfigStore::open(&path).expect("reopen");
        assert_eq!(
            reopened.get(ConfigKey::GitDefaultBranch).as_deref(),
            Some("main")
        );
    }

    #[test]
    fn load_applies_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = TomlConfigStore::open(temp.path().join("config.toml")).expect("open");
        store
            .try_set(ConfigKey::SessionCookie, &valid_session())
            .expect("set");

        let cfg = EnvironmentConfig::load(&store).expect("load");
        assert_eq!(cfg.git_default_branch, DEFAULT_BRANCH);
        assert!(!cfg.no_git);
        assert!(!cfg.silent_output);
    }

    #[test]
    fn load_without_session_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = TomlConfigStore::open(temp.path().join("config.toml")).expect("open");
        assert_eq!(
            EnvironmentConfig::load(&store).unwrap_err(),
            ConfigError::SessionMissing
        );
    }

    #[test]
    fn invalid_flag_is_reported() {
        assert!(parse_flag(ConfigKey::NoGit, "TRUE").expect("parse"));
        assert!(parse_flag(ConfigKey::NoGit, "yes").is_err());
    }

    #[test]
    fn session_shape_is_checked() {
        assert!(validate_session(&valid_session()).is_ok());
        assert!(validate_session("53616c7465645f5f").is_err());
        let wrong_prefix = format!("00{}", &valid_session()[2..]);
        assert!(validate_session(&wrong_prefix).is_err());
    }

    #[test]
    fn debug_output_masks_session() {
        let cfg = EnvironmentConfig {
            session_cookie: valid_session(),
            git_default_branch: "main".to_string(),
            no_git: false,
            silent_output: false,
        };
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains(&valid_session()));
        assert!(rendered.contains("5361..."));
    }
}
