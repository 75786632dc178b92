//! File-backed host for running the pipeline outside the media center.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Deserialize;
use thiserror::Error;

use super::{AddonInfo, AddonManager, HostSettings, HostUi, InstalledAddon, Platform, RawSetting};

/// Errors that can occur when loading a host fixture.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to read host fixture '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse host fixture '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Fixture {
    addon: AddonInfo,
    #[serde(default)]
    platform: Option<Platform>,
    #[serde(default = "default_language")]
    language: String,
    /// Virtual prefix -> real prefix.
    #[serde(default)]
    paths: BTreeMap<String, String>,
    #[serde(default)]
    strings: BTreeMap<String, String>,
    #[serde(default)]
    settings: Vec<RawSetting>,
    #[serde(default)]
    ui: UiScript,
    #[serde(default)]
    addons: Vec<InstalledAddon>,
}

/// Scripted answers for the interactive parts of the host.
#[derive(Debug, Clone, Default, Deserialize)]
struct UiScript {
    /// Answer given to every confirmation dialog.
    #[serde(default)]
    confirm: bool,
    /// Number of polls that report the settings window as still open.
    #[serde(default)]
    settings_open_polls: u32,
}

fn default_language() -> String {
    "en".to_string()
}

/// Host collaborator backed by a TOML fixture.
///
/// UI calls are written to the log instead of being displayed.
pub struct FixtureHost {
    fixture: Fixture,
    open_polls_left: Mutex<u32>,
    addons: Mutex<Vec<InstalledAddon>>,
}

impl FixtureHost {
    /// Loads a fixture from disk.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let content = fs::read_to_string(path).map_err(|e| HostError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml(&content).map_err(|e| HostError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parses a fixture from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let fixture: Fixture = toml::from_str(content)?;
        Ok(Self {
            open_polls_left: Mutex::new(fixture.ui.settings_open_polls),
            addons: Mutex::new(fixture.addons.clone()),
            fixture,
        })
    }
}

impl HostSettings for FixtureHost {
    fn addon_info(&self) -> AddonInfo {
        self.fixture.addon.clone()
    }

    fn translate_path(&self, path: &str) -> String {
        // Longest matching prefix wins.
        self.fixture
            .paths
            .iter()
            .filter(|(virtual_prefix, _)| path.starts_with(virtual_prefix.as_str()))
            .max_by_key(|(virtual_prefix, _)| virtual_prefix.len())
            .map(|(virtual_prefix, real)| format!("{}{}", real, &path[virtual_prefix.len()..]))
            .unwrap_or_else(|| path.to_string())
    }

    fn platform(&self) -> Option<Platform> {
        self.fixture.platform.clone()
    }

    fn language_code(&self) -> String {
        self.fixture.language.clone()
    }

    fn setting_string(&self, key: &str) -> String {
        self.fixture.strings.get(key).cloned().unwrap_or_default()
    }

    fn all_settings(&self) -> Vec<RawSetting> {
        self.fixture.settings.clone()
    }
}

impl HostUi for FixtureHost {
    fn open_settings(&self) {
        tracing::info!("Host: opening settings for {}", self.fixture.addon.id);
    }

    fn show_dialog(&self, title: &str, message: &str) {
        tracing::warn!("Host dialog [{}]: {}", title, message);
    }

    fn is_settings_open(&self) -> bool {
        let mut left = self.open_polls_left.lock();
        if *left == 0 {
            return false;
        }
        *left -= 1;
        true
    }

    fn notify(&self, title: &str, message: &str, icon: &Path) {
        tracing::info!("Host notification [{}]: {} ({})", title, message, icon.display());
    }

    fn confirm_dialog(&self, title: &str, message: &str) -> bool {
        tracing::info!(
            "Host confirmation [{}]: {} -> {}",
            title,
            message,
            self.fixture.ui.confirm
        );
        self.fixture.ui.confirm
    }
}

impl AddonManager for FixtureHost {
    fn script_addons(&self) -> Vec<InstalledAddon> {
        self.addons.lock().clone()
    }

    fn set_addon_enabled(&self, id: &str, enabled: bool) {
        for addon in self.addons.lock().iter_mut().filter(|a| a.id == id) {
            addon.enabled = enabled;
        }
    }

    fn update_local_addons(&self) {
        tracing::debug!("Host: updating local addons");
    }

    fn update_addon_repos(&self) {
        tracing::debug!("Host: updating addon repositories");
    }

    fn play_url(&self, url: &str) {
        tracing::info!("Host: launching {}", url);
    }
}
