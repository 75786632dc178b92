//! Declarative settings schema.
//!
//! Every host setting the configuration reads is listed here once, with the
//! kind it is expected to coerce to. Adding a setting: add a line to the
//! `settings!` table below; the key string is the host's setting id.

use crate::host::RawSetting;

/// Native kind a setting is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKind {
    Int,
    Float,
    Bool,
    Text,
}

impl SettingKind {
    /// Kinds a raw host setting of the declared type can coerce to.
    fn accepts(&self, raw_type: &str) -> bool {
        match raw_type {
            "enum" | "number" => *self == SettingKind::Int,
            "slider" => matches!(self, SettingKind::Int | SettingKind::Float),
            "bool" => *self == SettingKind::Bool,
            _ => *self == SettingKind::Text,
        }
    }
}

macro_rules! settings {
    ($($variant:ident => $key:literal, $kind:ident;)+) => {
        /// Unique identifier for each host setting.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Setting {
            $($variant,)+
        }

        impl Setting {
            /// Host setting id.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }

            pub fn kind(&self) -> SettingKind {
                match self {
                    $(Self::$variant => SettingKind::$kind,)+
                }
            }

            /// All settings, in declaration order.
            pub fn all() -> &'static [Setting] {
                &[$(Self::$variant,)+]
            }

            /// Parse from a host setting id. Unknown ids return `None`.
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($key => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

settings! {
    DownloadStorage => "download_storage", Int;
    AutoMemorySize => "auto_memory_size", Bool;
    AutoMemorySizeStrategy => "auto_memory_size_strategy", Int;
    MemorySize => "memory_size", Int;
    BufferSize => "buffer_size", Int;
    MaxUploadRate => "max_upload_rate", Int;
    MaxDownloadRate => "max_download_rate", Int;
    SpoofUserAgent => "spoof_user_agent", Int;
    LimitAfterBuffering => "limit_after_buffering", Bool;
    KeepDownloading => "keep_downloading", Int;
    KeepFilesPlaying => "keep_files_playing", Int;
    KeepFilesFinished => "keep_files_finished", Int;
    DisableBgProgress => "disable_bg_progress", Bool;
    DisableBgProgressPlayback => "disable_bg_progress_playback", Bool;
    ForceUseTrakt => "force_use_trakt", Bool;
    UseCacheSelection => "use_cache_selection", Bool;
    UseCacheSearch => "use_cache_search", Bool;
    CacheSearchDuration => "cache_search_duration", Int;
    ResultsPerPage => "results_per_page", Int;
    EnableOverlayStatus => "enable_overlay_status", Bool;
    SilentStreamStart => "silent_stream_start", Bool;
    ChooseStreamAuto => "choose_stream_auto", Bool;
    ForceLinkType => "force_link_type", Bool;
    UseOriginalTitle => "use_original_title", Bool;
    AddSpecials => "add_specials", Bool;
    UnairedSeasons => "unaired_seasons", Bool;
    UnairedEpisodes => "unaired_episodes", Bool;
    SmartEpisodeMatch => "smart_episode_match", Bool;
    SeedTimeLimit => "seed_time_limit", Int;
    DisableUpload => "disable_upload", Bool;
    DisableDht => "disable_dht", Bool;
    DisableTcp => "disable_tcp", Bool;
    DisableUtp => "disable_utp", Bool;
    DisableUpnp => "disable_upnp", Bool;
    EncryptionPolicy => "encryption_policy", Int;
    ListenPortMin => "listen_port_min", Int;
    ListenPortMax => "listen_port_max", Int;
    ListenInterfaces => "listen_interfaces", Text;
    ListenAutodetectIp => "listen_autodetect_ip", Bool;
    ListenAutodetectPort => "listen_autodetect_port", Bool;
    ConnectionsLimit => "connections_limit", Int;
    TraktScrobble => "trakt_scrobble", Bool;
    TraktUsername => "trakt_username", Text;
    TraktToken => "trakt_token", Text;
    TraktRefreshToken => "trakt_refresh_token", Text;
    TraktTokenExpiry => "trakt_token_expiry", Int;
    TraktSync => "trakt_sync", Int;
    TraktSyncCollections => "trakt_sync_collections", Bool;
    TraktSyncWatchlist => "trakt_sync_watchlist", Bool;
    TraktSyncUserlists => "trakt_sync_userlists", Bool;
    TraktSyncWatched => "trakt_sync_watched", Bool;
    TraktSyncWatchedBack => "trakt_sync_watchedback", Bool;
    LibraryUpdateFrequency => "library_update_frequency", Int;
    LibraryUpdateDelay => "library_update_delay", Int;
    LibraryAutoScan => "library_auto_scan", Bool;
    PlayResume => "play_resume", Bool;
    UseCloudhole => "use_cloudhole", Bool;
    CloudholeKey => "cloudhole_key", Text;
    TmdbApiKey => "tmdb_api_key", Text;
    OsdbUser => "osdb_user", Text;
    OsdbPass => "osdb_pass", Text;
    OsdbLanguage => "osdb_language", Text;
    OsdbAutoLanguage => "osdb_auto_language", Bool;
    SortingModeMovies => "sorting_mode_movies", Int;
    SortingModeShows => "sorting_mode_shows", Int;
    ResolutionPreferenceMovies => "resolution_preference_movies", Int;
    ResolutionPreferenceShows => "resolution_preference_shows", Int;
    PercentageAdditionalSeeders => "percentage_additional_seeders", Int;
    UsePublicDns => "use_public_dns", Bool;
    PublicDnsList => "public_dns_list", Text;
    OpennicDnsList => "opennic_dns_list", Text;
    CustomProviderTimeoutEnabled => "custom_provider_timeout_enabled", Bool;
    CustomProviderTimeout => "custom_provider_timeout", Int;
    ProxyType => "proxy_type", Int;
    ProxyEnabled => "proxy_enabled", Bool;
    ProxyHost => "proxy_host", Text;
    ProxyPort => "proxy_port", Int;
    ProxyLogin => "proxy_login", Text;
    ProxyPassword => "proxy_password", Text;
    CompletedMove => "completed_move", Bool;
    CompletedMoviesPath => "completed_movies_path", Text;
    CompletedShowsPath => "completed_shows_path", Text;
}

/// Differences between the schema and what the host reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Schema settings the host never reported.
    pub missing: Vec<Setting>,
    /// Settings reported with a declared type the schema cannot read.
    pub mismatched: Vec<(Setting, String)>,
}

impl SchemaReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

/// Compares the host's raw settings against the schema.
pub fn validate_schema(raw: &[RawSetting]) -> SchemaReport {
    let mut report = SchemaReport::default();

    for setting in Setting::all() {
        match raw.iter().find(|r| r.key == setting.as_str()) {
            None => report.missing.push(*setting),
            Some(r) if !setting.kind().accepts(&r.kind) => {
                report.mismatched.push((*setting, r.kind.clone()));
            }
            Some(_) => {}
        }
    }
    report
}
