//! Targets file loading.
//!
//! The file is a JSON array of `{channel_name, app_name, webhook_url}` objects.
//! Loading never panics: every outcome is logged, recorded in [`LoadStatus`],
//! and returned to the caller as a typed result.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::Result;
use crate::config::DEFAULT_TARGETS_PATH;
use crate::error::StoreError;
use crate::types::{LoadStatus, Target, TargetSummary};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: String,
    base_dir: Option<PathBuf>,
    status: LoadStatus,
    targets: Vec<Target>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_TARGETS_PATH)
    }
}

impl ConfigStore {
    pub fn new(config_path: impl Into<String>) -> Self {
        Self {
            config_path: config_path.into(),
            base_dir: None,
            status: LoadStatus::NotLoaded,
            targets: Vec::new(),
        }
    }

    /// Resolve the targets file under `dir` instead of the working directory.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Replace the targets file path. Blank input keeps the current one.
    pub fn set_path(&mut self, path: Option<&str>) {
        match path.map(str::trim) {
            Some(path) if !path.is_empty() => {
                debug!(path, "configuration path updated");
                self.config_path = path.to_string();
            }
            _ => debug!(path = %self.config_path, "configuration path unchanged"),
        }
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Location the targets file is read from.
    ///
    /// The configured path is always taken relative to the base directory,
    /// so the default `/configuration/config.js` lands under the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error when no base directory is set and the working
    /// directory cannot be determined.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        let base = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|source| StoreError::Read {
                path: PathBuf::from(&self.config_path),
                source,
            })?,
        };
        Ok(base.join(self.config_path.trim_start_matches('/')))
    }

    /// Read and parse the targets file, replacing any previous contents.
    ///
    /// On failure the status becomes [`LoadStatus::Invalid`] and the target
    /// list is emptied, whatever was loaded before.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`], [`StoreError::Empty`],
    /// [`StoreError::Malformed`] or [`StoreError::Read`] depending on what
    /// went wrong.
    pub fn load(&mut self) -> Result<usize> {
        match self.read_targets() {
            Ok(targets) => {
                info!(count = targets.len(), "configuration loading completed");
                self.status = LoadStatus::Loaded;
                self.targets = targets;
                Ok(self.targets.len())
            }
            Err(err) => {
                warn!(error = %err, "configuration load failed");
                self.status = LoadStatus::Invalid;
                self.targets.clear();
                Err(err)
            }
        }
    }

    fn read_targets(&self) -> Result<Vec<Target>> {
        let path = self.resolved_path()?;
        let content = read_file(&path)?;
        info!(path = %path.display(), "configuration file found");

        if content.trim().is_empty() {
            return Err(StoreError::Empty { path }.into());
        }

        let targets: Vec<Target> = serde_json::from_str(&content)
            .map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "configuration content is valid JSON");
        Ok(targets)
    }

    /// Summaries of every target, each one also logged.
    pub fn list_targets(&self) -> Vec<TargetSummary> {
        self.targets
            .iter()
            .map(|target| {
                let summary = target.summary();
                info!(
                    channel = %summary.channel_name,
                    app = %summary.app_name,
                    url_well_formed = summary.url_well_formed,
                    "configured target"
                );
                summary
            })
            .collect()
    }
}

fn read_file(path: &Path) -> std::result::Result<String, StoreError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::ConfigStore;
    use crate::error::{Error, StoreError};
    use crate::types::LoadStatus;

    const ONE_TARGET: &str =
        r#"[{"channel_name":"ops","app_name":"bot","webhook_url":"https://hooks.example.com/x"}]"#;

    fn store_with(contents: Option<&str>) -> (TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("configuration")).unwrap();
        if let Some(contents) = contents {
            fs::write(dir.path().join("configuration/config.js"), contents).unwrap();
        }
        let store = ConfigStore::default().with_base_dir(dir.path());
        (dir, store)
    }

    #[test]
    fn starts_not_loaded() {
        let store = ConfigStore::default();
        assert_eq!(store.status(), LoadStatus::NotLoaded);
        assert!(store.targets().is_empty());
    }

    #[test]
    fn set_path_ignores_blank_input() {
        let mut store = ConfigStore::default();
        store.set_path(None);
        store.set_path(Some("   "));
        assert_eq!(store.config_path(), "/configuration/config.js");
        store.set_path(Some("/elsewhere/hooks.json"));
        assert_eq!(store.config_path(), "/elsewhere/hooks.json");
    }

    #[test]
    fn resolves_leading_slash_under_base_dir() {
        let (dir, store) = store_with(None);
        assert_eq!(
            store.resolved_path().unwrap(),
            dir.path().join("configuration/config.js")
        );
    }

    #[test]
    fn loads_valid_file() {
        let (_dir, mut store) = store_with(Some(ONE_TARGET));
        assert_eq!(store.load().unwrap(), 1);
        assert_eq!(store.status(), LoadStatus::Loaded);
        let target = &store.targets()[0];
        assert_eq!(target.channel_name, "ops");
        assert_eq!(target.app_name, "bot");
        assert_eq!(target.webhook_url, "https://hooks.example.com/x");
    }

    #[test]
    fn missing_file_is_invalid() {
        let (_dir, mut store) = store_with(None);
        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Missing { .. })));
        assert_eq!(store.status(), LoadStatus::Invalid);
        assert!(store.targets().is_empty());
    }

    #[test]
    fn whitespace_file_is_invalid() {
        let (_dir, mut store) = store_with(Some("   "));
        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Empty { .. })));
        assert_eq!(store.status(), LoadStatus::Invalid);
    }

    #[test]
    fn malformed_json_is_invalid() {
        let (_dir, mut store) = store_with(Some("[{\"channel_name\": "));
        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Malformed { .. })));
        assert_eq!(store.status(), LoadStatus::Invalid);
        assert!(store.targets().is_empty());
    }

    #[test]
    fn failed_reload_clears_previous_targets() {
        let (dir, mut store) = store_with(Some(ONE_TARGET));
        store.load().unwrap();
        fs::remove_file(dir.path().join("configuration/config.js")).unwrap();
        assert!(store.load().is_err());
        assert_eq!(store.status(), LoadStatus::Invalid);
        assert!(store.targets().is_empty());
    }

    #[test]
    fn empty_array_loads_with_no_targets() {
        let (_dir, mut store) = store_with(Some("[]"));
        assert_eq!(store.load().unwrap(), 0);
        assert_eq!(store.status(), LoadStatus::Loaded);
    }

    #[test]
    fn list_targets_flags_malformed_urls() {
        let (_dir, mut store) = store_with(Some(
            r#"[
                {"channel_name":"ops","app_name":"bot","webhook_url":"https://hooks.example.com/x"},
                {"channel_name":"dev","app_name":"ci","webhook_url":"not a url"}
            ]"#,
        ));
        store.load().unwrap();
        let summaries = store.list_targets();
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].url_well_formed);
        assert!(!summaries[1].url_well_formed);
        assert_eq!(summaries[1].channel_name, "dev");
    }
}
