//! `aoc init`: validate and persist the user configuration.

use anyhow::Result;
use tracing::debug;

use crate::io::config::{ConfigKey, ConfigStore, mask_session, validate_session};
use crate::io::console::{Reporter, emphasize};

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub session: String,
    pub branch: Option<String>,
    pub no_git: Option<bool>,
    pub silent: Option<bool>,
}

/// Store every provided value. The session is validated before anything is written.
pub fn run_init(store: &mut dyn ConfigStore, options: &InitOptions, reporter: &Reporter) -> Result<()> {
    let session = options.session.trim();
    validate_session(session)?;

    store_value(
        store,
        reporter,
        ConfigKey::SessionCookie,
        "Session cookie",
        session,
        &mask_session(session),
    )?;
    if let Some(branch) = options.branch.as_deref() {
        store_value(
            store,
            reporter,
            ConfigKey::GitDefaultBranch,
            "Default branch",
            branch,
            branch,
        )?;
    }
    for (key, label, flag) in [
        (ConfigKey::NoGit, "No-git flag", options.no_git),
        (ConfigKey::SilentOutput, "Silent output flag", options.silent),
    ] {
        if let Some(flag) = flag {
            let value = flag.to_string();
            store_value(store, reporter, key, label, &value, &value)?;
        }
    }
    Ok(())
}

fn store_value(
    store: &mut dyn ConfigStore,
    reporter: &Reporter,
    key: ConfigKey,
    label: &str,
    value: &str,
    shown: &str,
) -> Result<()> {
    if store.try_set(key, value)? {
        debug!(key = key.as_str(), "stored");
        reporter.success(&format!("{label} saved: {}", emphasize(shown)));
    } else {
        reporter.info(&format!("{label} unmodified"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{AocError, ConfigError, find_domain_error};
    use crate::io::config::{EnvironmentConfig, TomlConfigStore};
    use crate::test_support::valid_session;

    #[test]
    fn invalid_session_writes_nothing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        let mut store = TomlConfigStore::open(&path).expect("open");
        let options = InitOptions {
            session: "not-a-session".to_string(),
            branch: Some("main".to_string()),
            ..InitOptions::default()
        };

        let err = run_init(&mut store, &options, &Reporter::new(true)).unwrap_err();
        assert!(matches!(
            find_domain_error(&err),
            Some(AocError::Config(ConfigError::InvalidSession { .. }))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn stores_all_values() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        let mut store = TomlConfigStore::open(&path).expect("open");
        let options = InitOptions {
            session: valid_session(),
            branch: Some("main".to_string()),
            no_git: Some(true),
            silent: Some(false),
        };
        run_init(&mut store, &options, &Reporter::new(true)).expect("init");

        let reopened = TomlConfigStore::open(&path).expect("reopen");
        let cfg = EnvironmentConfig::load(&reopened).expect("load");
        assert_eq!(cfg.session_cookie, valid_session());
        assert_eq!(cfg.git_default_branch, "main");
        assert!(cfg.no_git);
        assert!(!cfg.silent_output);
    }
}
