//! Shared test utilities and a scriptable in-memory host.

#![allow(dead_code, unused_imports)]

use addon_config::config::{ConfigStore, ConfigurationReconciler, DnsResolvers, FixedMemory};
use addon_config::host::{
    AddonInfo, AddonManager, HostSettings, HostUi, InstalledAddon, Platform, RawSetting,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const ADDON_ID: &str = "plugin.video.test";
pub const GIB: u64 = 1024 * 1024 * 1024;

/// A host call recorded by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    OpenSettings,
    Dialog { title: String, message: String },
    Notify { title: String, message: String },
    Confirm { title: String, message: String },
    SetEnabled { id: String, enabled: bool },
    UpdateLocalAddons,
    UpdateAddonRepos,
    PlayUrl(String),
}

/// In-memory host whose settings and answers can be changed between reloads.
pub struct RecordingHost {
    pub info: AddonInfo,
    pub platform: Option<Platform>,
    pub temp_root: PathBuf,
    strings: Mutex<HashMap<String, String>>,
    settings: Mutex<Vec<RawSetting>>,
    calls: Mutex<Vec<HostCall>>,
    open_polls_left: Mutex<u32>,
    confirm: Mutex<bool>,
    addons: Mutex<Vec<InstalledAddon>>,
    /// Addon enabled by `play_url` for "plugin://<id>/".
    install_on_play: Mutex<Option<String>>,
}

impl RecordingHost {
    /// A host whose special://temp maps into `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            info: AddonInfo {
                id: ADDON_ID.to_string(),
                name: "Test Addon".to_string(),
                version: "1.0.0".to_string(),
                path: root.join("addons").join(ADDON_ID).display().to_string(),
                profile: root.join("profile").display().to_string(),
                home: root.display().to_string(),
                xbmc: root.join("xbmc").display().to_string(),
                icon: String::new(),
                temp_path: String::new(),
            },
            platform: Some(Platform {
                os: "linux".to_string(),
                arch: "x64".to_string(),
            }),
            temp_root: root.join("temp"),
            strings: Mutex::new(HashMap::new()),
            settings: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            open_polls_left: Mutex::new(0),
            confirm: Mutex::new(false),
            addons: Mutex::new(Vec::new()),
            install_on_play: Mutex::new(None),
        }
    }

    pub fn set_string(&self, key: &str, value: &str) {
        self.strings.lock().insert(key.to_string(), value.to_string());
    }

    /// Points the download path setting at `dir`.
    pub fn set_download_dir(&self, dir: &Path) {
        self.set_string("download_path", &dir_setting(dir));
    }

    pub fn set_library_dir(&self, dir: &Path) {
        self.set_string("library_path", &dir_setting(dir));
    }

    pub fn set_settings(&self, settings: Vec<RawSetting>) {
        *self.settings.lock() = settings;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub fn set_settings_open_polls(&self, polls: u32) {
        *self.open_polls_left.lock() = polls;
    }

    pub fn settings_open_polls_left(&self) -> u32 {
        *self.open_polls_left.lock()
    }

    pub fn set_confirm(&self, answer: bool) {
        *self.confirm.lock() = answer;
    }

    pub fn set_addons(&self, addons: Vec<InstalledAddon>) {
        *self.addons.lock() = addons;
    }

    pub fn addons(&self) -> Vec<InstalledAddon> {
        self.addons.lock().clone()
    }

    pub fn install_on_play(&self, id: &str) {
        *self.install_on_play.lock() = Some(id.to_string());
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().push(call);
    }
}

impl HostSettings for RecordingHost {
    fn addon_info(&self) -> AddonInfo {
        self.info.clone()
    }

    fn translate_path(&self, path: &str) -> String {
        match path.strip_prefix("special://temp") {
            Some(rest) => format!("{}{}", self.temp_root.display(), rest),
            None => path.to_string(),
        }
    }

    fn platform(&self) -> Option<Platform> {
        self.platform.clone()
    }

    fn language_code(&self) -> String {
        "en".to_string()
    }

    fn setting_string(&self, key: &str) -> String {
        self.strings.lock().get(key).cloned().unwrap_or_default()
    }

    fn all_settings(&self) -> Vec<RawSetting> {
        self.settings.lock().clone()
    }
}

impl HostUi for RecordingHost {
    fn open_settings(&self) {
        self.record(HostCall::OpenSettings);
    }

    fn show_dialog(&self, title: &str, message: &str) {
        self.record(HostCall::Dialog {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn is_settings_open(&self) -> bool {
        let mut left = self.open_polls_left.lock();
        if *left == 0 {
            return false;
        }
        *left -= 1;
        true
    }

    fn notify(&self, title: &str, message: &str, _icon: &Path) {
        self.record(HostCall::Notify {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn confirm_dialog(&self, title: &str, message: &str) -> bool {
        self.record(HostCall::Confirm {
            title: title.to_string(),
            message: message.to_string(),
        });
        *self.confirm.lock()
    }
}

impl AddonManager for RecordingHost {
    fn script_addons(&self) -> Vec<InstalledAddon> {
        self.addons.lock().clone()
    }

    fn set_addon_enabled(&self, id: &str, enabled: bool) {
        self.record(HostCall::SetEnabled {
            id: id.to_string(),
            enabled,
        });
        for addon in self.addons.lock().iter_mut().filter(|a| a.id == id) {
            addon.enabled = enabled;
        }
    }

    fn update_local_addons(&self) {
        self.record(HostCall::UpdateLocalAddons);
    }

    fn update_addon_repos(&self) {
        self.record(HostCall::UpdateAddonRepos);
    }

    fn play_url(&self, url: &str) {
        self.record(HostCall::PlayUrl(url.to_string()));
        let Some(id) = self.install_on_play.lock().clone() else {
            return;
        };
        if url == format!("plugin://{}/", id) {
            self.addons.lock().push(InstalledAddon {
                id,
                name: String::new(),
                version: String::new(),
                enabled: true,
            });
        }
    }
}

/// Directory setting value as the host reports it (trailing separator).
pub fn dir_setting(dir: &Path) -> String {
    format!("{}/", dir.display())
}

/// Temp root plus a host with a writable download directory.
pub fn host_with_downloads() -> (TempDir, Arc<RecordingHost>, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let downloads = temp_dir.path().join("downloads");
    std::fs::create_dir_all(&downloads).expect("Failed to create downloads dir");

    let host = RecordingHost::new(temp_dir.path());
    host.set_download_dir(&downloads);
    (temp_dir, Arc::new(host), downloads)
}

/// Reconciler over `host` with a fixed memory size and no provider check.
pub fn reconciler(host: Arc<RecordingHost>, total_memory: u64) -> ConfigurationReconciler {
    ConfigurationReconciler::new(host, ConfigStore::default(), Arc::new(DnsResolvers::new()))
        .with_memory_probe(Arc::new(FixedMemory(total_memory)))
        .with_health_check(None)
}
