use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::host::{AddonInfo, Platform};

/// Port of the addon's local control server.
pub const LISTEN_PORT: u16 = 65220;

/// `download_storage` value selecting memory-backed storage.
pub const STORAGE_MEMORY: i64 = 1;

/// `keep_*` value meaning "always".
pub const KEEP_ALWAYS: i64 = 2;

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug, Display or Serialize.
/// Use `expose()` to access the actual value when needed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

impl Serialize for SecureString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("••••••••")
    }
}

/// One immutable configuration snapshot.
///
/// Built once per reload and never mutated after it is published.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Configuration {
    // Paths
    pub download_path: PathBuf,
    pub torrents_path: PathBuf,
    pub library_path: PathBuf,
    pub info: AddonInfo,
    pub platform: Option<Platform>,
    /// Active UI language (ISO-639-1).
    pub language: String,
    pub temporary_path: PathBuf,
    pub profile_path: PathBuf,
    pub home_path: PathBuf,
    pub xbmc_path: PathBuf,

    // Playback and UI
    pub spoof_user_agent: i64,
    pub keep_downloading: i64,
    pub keep_files_playing: i64,
    pub keep_files_finished: i64,
    pub disable_bg_progress: bool,
    pub disable_bg_progress_playback: bool,
    pub force_use_trakt: bool,
    pub use_cache_selection: bool,
    pub use_cache_search: bool,
    pub cache_search_duration: i64,
    pub results_per_page: i64,
    pub enable_overlay_status: bool,
    pub silent_stream_start: bool,
    pub choose_stream_auto: bool,
    pub force_link_type: bool,
    pub use_original_title: bool,
    pub add_specials: bool,
    pub show_unaired_seasons: bool,
    pub show_unaired_episodes: bool,
    pub smart_episode_match: bool,

    // Storage and session
    pub download_storage: i64,
    pub auto_memory_size: bool,
    pub auto_memory_size_strategy: i64,
    /// Bytes.
    pub memory_size: i64,
    /// Bytes.
    pub buffer_size: i64,
    /// Bytes per second.
    pub upload_rate_limit: i64,
    /// Bytes per second.
    pub download_rate_limit: i64,
    pub limit_after_buffering: bool,
    pub connections_limit: i64,
    pub seed_time_limit: i64,
    pub disable_upload: bool,
    pub disable_dht: bool,
    pub disable_tcp: bool,
    pub disable_utp: bool,
    pub disable_upnp: bool,
    pub encryption_policy: i64,
    pub listen_port_min: i64,
    pub listen_port_max: i64,
    pub listen_interfaces: String,
    pub listen_autodetect_ip: bool,
    pub listen_autodetect_port: bool,
    pub scrobble: bool,

    // Trakt
    pub trakt_username: String,
    pub trakt_token: SecureString,
    pub trakt_refresh_token: SecureString,
    pub trakt_token_expiry: i64,
    /// Hours between syncs.
    pub trakt_sync_frequency: i64,
    pub trakt_sync_collections: bool,
    pub trakt_sync_watchlist: bool,
    pub trakt_sync_userlists: bool,
    pub trakt_sync_watched: bool,
    pub trakt_sync_watched_back: bool,

    // Library
    pub update_frequency: i64,
    pub update_delay: i64,
    pub update_auto_scan: bool,
    pub play_resume: bool,
    pub use_cloudhole: bool,
    pub cloudhole_key: SecureString,
    pub tmdb_api_key: SecureString,

    // Subtitles
    pub osdb_user: String,
    pub osdb_pass: SecureString,
    pub osdb_language: String,
    pub osdb_auto_language: bool,

    // Sorting
    pub sorting_mode_movies: i64,
    pub sorting_mode_shows: i64,
    pub resolution_preference_movies: i64,
    pub resolution_preference_shows: i64,
    pub percentage_additional_seeders: i64,

    // Network
    pub use_public_dns: bool,
    pub public_dns_list: String,
    pub opennic_dns_list: String,
    pub custom_provider_timeout_enabled: bool,
    pub custom_provider_timeout: i64,

    pub proxy_url: Option<SecureString>,
    pub proxy_type: i64,
    pub proxy_enabled: bool,
    pub proxy_host: String,
    pub proxy_port: i64,
    pub proxy_login: String,
    pub proxy_password: SecureString,

    // Completed downloads
    pub completed_move: bool,
    pub completed_movies_path: String,
    pub completed_shows_path: String,
}

impl Configuration {
    /// Icon shipped with the addon.
    pub fn addon_icon(&self) -> PathBuf {
        PathBuf::from(&self.info.path).join("icon.png")
    }

    /// File under the addon's `resources` directory.
    pub fn addon_resource(&self, parts: &[&str]) -> PathBuf {
        parts
            .iter()
            .fold(PathBuf::from(&self.info.path).join("resources"), |acc, part| {
                acc.join(part)
            })
    }
}
