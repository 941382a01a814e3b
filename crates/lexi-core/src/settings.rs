//! Settings persisted in the synced storage area.

use std::rc::Rc;
use lexi_types::{Result, config::Settings};
use crate::ports::StoragePort;

pub const SETTINGS_KEY: &str = "settings";

#[derive(Clone)]
pub struct SettingsStore {
    storage: Rc<dyn StoragePort>,
}

impl SettingsStore {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    /// Stored settings; absent fields (or an absent record) take defaults.
    pub async fn load(&self) -> Result<Settings> {
        match self.storage.get(SETTINGS_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Settings::default()),
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        self.storage
            .set(SETTINGS_KEY, serde_json::to_value(settings)?)
            .await
    }

    /// Load, apply `f`, save. Returns the saved settings.
    pub async fn update(&self, f: impl FnOnce(&mut Settings)) -> Result<Settings> {
        let mut settings = self.load().await?;
        f(&mut settings);
        self.save(&settings).await?;
        Ok(settings)
    }

    /// Seed defaults on first install. Returns `true` if anything was written.
    pub async fn install_defaults(&self) -> Result<bool> {
        if self.storage.get(SETTINGS_KEY).await?.is_some() {
            return Ok(false);
        }
        self.save(&Settings::default()).await?;
        log::info!("Default settings installed ({})", self.storage.backend_name());
        Ok(true)
    }
}
