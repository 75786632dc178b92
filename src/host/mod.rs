//! Host platform collaborators.
//!
//! The media-center host owns the settings UI, the addon lifecycle and the
//! notification surface. This module only describes the seams the reload
//! pipeline talks through; [`FixtureHost`] backs them with a TOML file so the
//! pipeline can run outside a host.

mod fixture;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use fixture::{FixtureHost, HostError};

/// Addon descriptor reported by the host.
///
/// Paths may be virtual (`special://...`) until translated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonInfo {
    /// Addon identifier (e.g. "plugin.video.elementum").
    pub id: String,
    /// Display name, used as the title of dialogs.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// Install directory of the addon.
    pub path: String,
    /// Per-user data directory of the addon.
    pub profile: String,
    /// Home directory of the host installation.
    pub home: String,
    /// Install directory of the host application itself.
    #[serde(default)]
    pub xbmc: String,
    #[serde(default)]
    pub icon: String,
    /// Scratch directory. Filled in during path resolution.
    #[serde(default)]
    pub temp_path: String,
}

impl AddonInfo {
    /// Last dotted segment of the addon id ("plugin.video.foo" -> "foo").
    pub fn short_name(&self) -> &str {
        self.id.rsplit('.').next().unwrap_or(&self.id)
    }
}

/// OS identity reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: String,
    #[serde(default)]
    pub arch: String,
}

/// One untyped setting as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSetting {
    pub key: String,
    /// Declared type: "enum", "number", "slider", "bool" or anything else for text.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: String,
    /// Slider sub-option: "percent", "int" or "float".
    #[serde(default)]
    pub option: String,
}

impl RawSetting {
    pub fn new(key: &str, kind: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: kind.to_string(),
            value: value.to_string(),
            option: String::new(),
        }
    }

    pub fn slider(key: &str, option: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: "slider".to_string(),
            value: value.to_string(),
            option: option.to_string(),
        }
    }
}

/// An installed addon as listed by the host's addon manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledAddon {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub enabled: bool,
}

/// Settings and environment queries.
pub trait HostSettings: Send + Sync {
    fn addon_info(&self) -> AddonInfo;
    /// Translate a virtual path into a real one.
    fn translate_path(&self, path: &str) -> String;
    fn platform(&self) -> Option<Platform>;
    /// Active UI language as an ISO-639-1 code.
    fn language_code(&self) -> String;
    fn setting_string(&self, key: &str) -> String;
    fn all_settings(&self) -> Vec<RawSetting>;
}

/// Dialogs and the settings window.
pub trait HostUi: Send + Sync {
    fn open_settings(&self);
    fn show_dialog(&self, title: &str, message: &str);
    fn is_settings_open(&self) -> bool;
    fn notify(&self, title: &str, message: &str, icon: &Path);
    fn confirm_dialog(&self, title: &str, message: &str) -> bool;
}

/// Addon discovery and lifecycle.
pub trait AddonManager: Send + Sync {
    /// Installed executable script addons.
    fn script_addons(&self) -> Vec<InstalledAddon>;
    fn set_addon_enabled(&self, id: &str, enabled: bool);
    fn update_local_addons(&self);
    fn update_addon_repos(&self);
    fn play_url(&self, url: &str);
}

/// Everything the reload pipeline and its background check need.
pub trait Host: HostSettings + HostUi + AddonManager {}

impl<T: HostSettings + HostUi + AddonManager> Host for T {}
