use tracing::{info, warn};

use crate::Result;
use crate::error::SelectError;
use crate::types::{DEFAULT_APP_NAME, Target};

/// Holds the target subsequent sends go to.
#[derive(Debug, Clone, Default)]
pub struct TargetSelector {
    current: Option<Target>,
}

impl TargetSelector {
    pub const fn new() -> Self {
        Self { current: None }
    }

    pub const fn current(&self) -> Option<&Target> {
        self.current.as_ref()
    }

    /// Select the first configured target.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::EmptyConfiguration`] when `targets` is empty;
    /// the current selection is left as it was.
    pub fn initialize_default(&mut self, targets: &[Target]) -> Result<&Target> {
        let first = targets.first().ok_or(SelectError::EmptyConfiguration)?;
        info!(
            channel = %first.channel_name,
            app = %first.app_name,
            "default target selected"
        );
        Ok(&*self.current.insert(first.clone()))
    }

    /// Select the target matching `channel_name` and `app_name` exactly.
    ///
    /// `app_name` defaults to `"none"`. When several targets share the pair,
    /// the first one in file order wins.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::NotFound`] when nothing matches; the current
    /// selection is left as it was.
    pub fn select(
        &mut self,
        targets: &[Target],
        channel_name: &str,
        app_name: Option<&str>,
    ) -> Result<&Target> {
        let app_name = app_name.unwrap_or(DEFAULT_APP_NAME);
        let Some(found) = targets
            .iter()
            .find(|target| target.matches(channel_name, app_name))
        else {
            warn!(
                channel = channel_name,
                app = app_name,
                "configuration setup failed: no matching target"
            );
            return Err(SelectError::NotFound {
                channel: channel_name.to_string(),
                app: app_name.to_string(),
            }
            .into());
        };

        info!(channel = channel_name, app = app_name, "target selected");
        Ok(&*self.current.insert(found.clone()))
    }
}
