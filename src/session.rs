use tracing::{info, warn};

use crate::Result;
use crate::config::Settings;
use crate::dispatch::{Delivery, Dispatcher, ProbeOutcome};
use crate::error::SendError;
use crate::selector::TargetSelector;
use crate::store::ConfigStore;
use crate::types::{LoadStatus, Target, TargetSummary};

/// Store, selector and dispatcher for one caller.
///
/// Built once per process; the targets file is read during construction and
/// every later failure leaves the loaded targets and the current selection
/// untouched.
pub struct Session {
    store: ConfigStore,
    selector: TargetSelector,
    dispatcher: Dispatcher,
}

impl Session {
    /// Build a session and load the targets file.
    ///
    /// A missing or broken targets file does not fail construction; it is
    /// logged and leaves the session with [`LoadStatus::Invalid`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the HTTP client cannot be built.
    pub fn open(settings: &Settings) -> Result<Self> {
        let mut store = ConfigStore::new(settings.targets.path.clone());
        if let Some(dir) = &settings.targets.base_dir {
            store = store.with_base_dir(dir);
        }
        let dispatcher = Dispatcher::new(&settings.http, settings.probe)?;
        let mut session = Self {
            store,
            selector: TargetSelector::new(),
            dispatcher,
        };
        session.reload();
        Ok(session)
    }

    /// Re-read the targets file, logging rather than returning failures.
    pub fn reload(&mut self) -> LoadStatus {
        if let Err(err) = self.store.load() {
            warn!(error = %err, "no configuration found, targets unavailable");
        }
        self.store.status()
    }

    pub fn set_config_path(&mut self, path: Option<&str>) {
        self.store.set_path(path);
    }

    pub const fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub const fn status(&self) -> LoadStatus {
        self.store.status()
    }

    pub fn list_targets(&self) -> Vec<TargetSummary> {
        self.store.list_targets()
    }

    pub const fn current_target(&self) -> Option<&Target> {
        self.selector.current()
    }

    /// Select the first configured target.
    ///
    /// # Errors
    ///
    /// Fails when no targets are loaded.
    pub fn initialize_default(&mut self) -> Result<&Target> {
        self.selector.initialize_default(self.store.targets())
    }

    /// Select by channel and app; `app_name` defaults to `"none"`.
    ///
    /// # Errors
    ///
    /// Fails when nothing matches; the previous selection stays current.
    pub fn select(&mut self, channel_name: &str, app_name: Option<&str>) -> Result<&Target> {
        self.selector
            .select(self.store.targets(), channel_name, app_name)
    }

    /// Probe the current target.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::NoTarget`] when nothing is selected.
    pub async fn probe_current_target(&self) -> Result<ProbeOutcome> {
        let target = self.current_target().ok_or(SendError::NoTarget)?;
        Ok(self.dispatcher.probe(target).await)
    }

    /// Probe the current target and report whether a send may proceed.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::NoTarget`] when nothing is selected.
    pub async fn check_current_target(&self) -> Result<bool> {
        let target = self.current_target().ok_or(SendError::NoTarget)?;
        Ok(self.dispatcher.check_target(target).await)
    }

    /// Post `message` to the current target.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::NoTarget`] when nothing is selected, otherwise
    /// the dispatcher's error.
    pub async fn send(&self, message: &str) -> Result<Delivery> {
        let target = self.current_target().ok_or(SendError::NoTarget)?;
        info!(
            channel = %target.channel_name,
            app = %target.app_name,
            url = %target.redacted_url(),
            "sending message"
        );
        self.dispatcher.send(target, message).await
    }
}
