//! Configuration reload pipeline.
//!
//! ```text
//! Idle → ResolvingPaths → ValidatingPaths → FetchingSettings → Coercing
//!      → Deriving → Publishing → Idle
//!                      ↘ Aborted (path validation failed)
//! ```
//!
//! A reload computes everything on local data and only takes the store's
//! write lock to swap in the finished snapshot. A rejected reload returns
//! [`ReloadError`]; what to do about it (settings window, exit status) is
//! decided by the caller, see [`crate::bootstrap`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::config::coerce::{coerce, TypedSettings};
use crate::config::derive::apply_derived;
use crate::config::dns::DnsResolvers;
use crate::config::error::ReloadError;
use crate::config::memory::{MemoryProbe, SystemMemory};
use crate::config::paths::{resolve_addon_info, translate_dir, QuirkContext, UNSET_PATH};
use crate::config::schema::{validate_schema, Setting};
use crate::config::store::ConfigStore;
use crate::config::types::{Configuration, SecureString};
use crate::config::writable::check_writable;
use crate::health::{spawn_provider_check, HealthCheckOptions};
use crate::host::{AddonInfo, Host, Platform};

const DOWNLOAD_PATH_SETTING: &str = "download_path";
const LIBRARY_PATH_SETTING: &str = "library_path";
const TORRENTS_DIR: &str = "Torrents";

const MIB: i64 = 1024 * 1024;
const KIB: i64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReloadPhase {
    Idle = 0,
    ResolvingPaths = 1,
    ValidatingPaths = 2,
    FetchingSettings = 3,
    Coercing = 4,
    Deriving = 5,
    Publishing = 6,
    Aborted = 7,
}

impl ReloadPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::ResolvingPaths,
            2 => Self::ValidatingPaths,
            3 => Self::FetchingSettings,
            4 => Self::Coercing,
            5 => Self::Deriving,
            6 => Self::Publishing,
            7 => Self::Aborted,
            _ => Self::Idle,
        }
    }
}

/// Paths and host facts gathered before settings are read.
struct ResolvedPaths {
    info: AddonInfo,
    platform: Option<Platform>,
    download: String,
    library: String,
}

/// Turns host settings into published configuration snapshots.
pub struct ConfigurationReconciler {
    host: Arc<dyn Host>,
    store: ConfigStore,
    resolvers: Arc<DnsResolvers>,
    memory: Arc<dyn MemoryProbe>,
    quirks: QuirkContext,
    health_check: Option<HealthCheckOptions>,
    phase: AtomicU8,
}

impl ConfigurationReconciler {
    /// Create a reconciler publishing into `store`.
    ///
    /// Uses the real system memory, the default platform quirk roots and
    /// schedules the provider check after every successful reload.
    pub fn new(host: Arc<dyn Host>, store: ConfigStore, resolvers: Arc<DnsResolvers>) -> Self {
        Self {
            host,
            store,
            resolvers,
            memory: Arc::new(SystemMemory),
            quirks: QuirkContext::default(),
            health_check: Some(HealthCheckOptions::default()),
            phase: AtomicU8::new(ReloadPhase::Idle as u8),
        }
    }

    pub fn with_memory_probe(mut self, memory: Arc<dyn MemoryProbe>) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_quirks(mut self, quirks: QuirkContext) -> Self {
        self.quirks = quirks;
        self
    }

    /// Set the provider check timing; `None` disables the check.
    pub fn with_health_check(mut self, options: Option<HealthCheckOptions>) -> Self {
        self.health_check = options;
        self
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn resolvers(&self) -> &Arc<DnsResolvers> {
        &self.resolvers
    }

    /// Current pipeline phase.
    pub fn phase(&self) -> ReloadPhase {
        ReloadPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    fn enter(&self, phase: ReloadPhase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
        tracing::debug!("Reload phase: {:?}", phase);
    }

    /// Runs one reload and publishes the result.
    ///
    /// Fails only when the download or library path is rejected; the store
    /// then keeps its previous snapshot.
    pub fn reload(&self) -> Result<Arc<Configuration>, ReloadError> {
        tracing::info!("Reloading configuration...");

        self.enter(ReloadPhase::ResolvingPaths);
        let platform = self.host.platform();
        let info = resolve_addon_info(self.host.as_ref(), platform.as_ref(), &self.quirks);

        self.enter(ReloadPhase::ValidatingPaths);
        let paths = match self.validate_paths(info, platform) {
            Ok(paths) => paths,
            Err(e) => {
                self.enter(ReloadPhase::Aborted);
                return Err(e);
            }
        };

        self.enter(ReloadPhase::FetchingSettings);
        let raw = self.host.all_settings();
        let report = validate_schema(&raw);
        for setting in &report.missing {
            tracing::debug!("Setting '{}' not reported by host", setting.as_str());
        }
        for (setting, declared) in &report.mismatched {
            tracing::warn!(
                "Setting '{}' declared as '{}', expected {:?}",
                setting.as_str(),
                declared,
                setting.kind()
            );
        }

        self.enter(ReloadPhase::Coercing);
        let typed = coerce(&raw);

        self.enter(ReloadPhase::Deriving);
        let mut config = build_configuration(&typed, paths, self.host.language_code());
        apply_derived(&mut config, self.memory.total_memory(), &self.resolvers);

        self.enter(ReloadPhase::Publishing);
        let snapshot = self.store.replace(config);
        self.enter(ReloadPhase::Idle);

        if let Some(options) = &self.health_check {
            // Not joined: the check outlives the reload.
            let _ = spawn_provider_check(
                Arc::clone(&self.host),
                snapshot.info.clone(),
                snapshot.addon_icon(),
                options.clone(),
            );
        }

        tracing::debug!("Using configuration: {:#?}", snapshot);
        Ok(snapshot)
    }

    fn validate_paths(
        &self,
        info: AddonInfo,
        platform: Option<Platform>,
    ) -> Result<ResolvedPaths, ReloadError> {
        let download = translate_dir(
            self.host.as_ref(),
            &self.host.setting_string(DOWNLOAD_PATH_SETTING),
        );
        if let Err(e) = check_writable(&download) {
            tracing::error!("Cannot write to location '{}': {}", download, e);
            return Err(ReloadError::new(DOWNLOAD_PATH_SETTING, e));
        }
        tracing::info!("Using download path: {}", download);

        let library = translate_dir(
            self.host.as_ref(),
            &self.host.setting_string(LIBRARY_PATH_SETTING),
        );
        let library = if library == UNSET_PATH {
            download.clone()
        } else {
            if let Err(e) = check_writable(&library) {
                tracing::error!("Cannot write to location '{}': {}", library, e);
                return Err(ReloadError::new(LIBRARY_PATH_SETTING, e));
            }
            library
        };
        tracing::info!("Using library path: {}", library);

        Ok(ResolvedPaths {
            info,
            platform,
            download,
            library,
        })
    }
}

fn secret(settings: &TypedSettings, setting: Setting) -> SecureString {
    SecureString::new(settings.text(setting))
}

/// Builds an unpublished snapshot from coerced settings.
fn build_configuration(s: &TypedSettings, paths: ResolvedPaths, language: String) -> Configuration {
    let download_path = PathBuf::from(&paths.download);

    Configuration {
        torrents_path: download_path.join(TORRENTS_DIR),
        download_path,
        library_path: PathBuf::from(&paths.library),
        temporary_path: PathBuf::from(&paths.info.temp_path),
        profile_path: PathBuf::from(&paths.info.profile),
        home_path: PathBuf::from(&paths.info.home),
        xbmc_path: PathBuf::from(&paths.info.xbmc),
        info: paths.info,
        platform: paths.platform,
        language,

        spoof_user_agent: s.int(Setting::SpoofUserAgent),
        keep_downloading: s.int(Setting::KeepDownloading),
        keep_files_playing: s.int(Setting::KeepFilesPlaying),
        keep_files_finished: s.int(Setting::KeepFilesFinished),
        disable_bg_progress: s.flag(Setting::DisableBgProgress),
        disable_bg_progress_playback: s.flag(Setting::DisableBgProgressPlayback),
        force_use_trakt: s.flag(Setting::ForceUseTrakt),
        use_cache_selection: s.flag(Setting::UseCacheSelection),
        use_cache_search: s.flag(Setting::UseCacheSearch),
        cache_search_duration: s.int(Setting::CacheSearchDuration),
        results_per_page: s.int(Setting::ResultsPerPage),
        enable_overlay_status: s.flag(Setting::EnableOverlayStatus),
        silent_stream_start: s.flag(Setting::SilentStreamStart),
        choose_stream_auto: s.flag(Setting::ChooseStreamAuto),
        force_link_type: s.flag(Setting::ForceLinkType),
        use_original_title: s.flag(Setting::UseOriginalTitle),
        add_specials: s.flag(Setting::AddSpecials),
        show_unaired_seasons: s.flag(Setting::UnairedSeasons),
        show_unaired_episodes: s.flag(Setting::UnairedEpisodes),
        smart_episode_match: s.flag(Setting::SmartEpisodeMatch),

        download_storage: s.int(Setting::DownloadStorage),
        auto_memory_size: s.flag(Setting::AutoMemorySize),
        auto_memory_size_strategy: s.int(Setting::AutoMemorySizeStrategy),
        memory_size: s.int(Setting::MemorySize).saturating_mul(MIB),
        buffer_size: s.int(Setting::BufferSize).saturating_mul(MIB),
        upload_rate_limit: s.int(Setting::MaxUploadRate).saturating_mul(KIB),
        download_rate_limit: s.int(Setting::MaxDownloadRate).saturating_mul(KIB),
        limit_after_buffering: s.flag(Setting::LimitAfterBuffering),
        connections_limit: s.int(Setting::ConnectionsLimit),
        seed_time_limit: s.int(Setting::SeedTimeLimit),
        disable_upload: s.flag(Setting::DisableUpload),
        disable_dht: s.flag(Setting::DisableDht),
        disable_tcp: s.flag(Setting::DisableTcp),
        disable_utp: s.flag(Setting::DisableUtp),
        disable_upnp: s.flag(Setting::DisableUpnp),
        encryption_policy: s.int(Setting::EncryptionPolicy),
        listen_port_min: s.int(Setting::ListenPortMin),
        listen_port_max: s.int(Setting::ListenPortMax),
        listen_interfaces: s.text(Setting::ListenInterfaces),
        listen_autodetect_ip: s.flag(Setting::ListenAutodetectIp),
        listen_autodetect_port: s.flag(Setting::ListenAutodetectPort),
        scrobble: s.flag(Setting::TraktScrobble),

        trakt_username: s.text(Setting::TraktUsername),
        trakt_token: secret(s, Setting::TraktToken),
        trakt_refresh_token: secret(s, Setting::TraktRefreshToken),
        trakt_token_expiry: s.int(Setting::TraktTokenExpiry),
        trakt_sync_frequency: s.int(Setting::TraktSync),
        trakt_sync_collections: s.flag(Setting::TraktSyncCollections),
        trakt_sync_watchlist: s.flag(Setting::TraktSyncWatchlist),
        trakt_sync_userlists: s.flag(Setting::TraktSyncUserlists),
        trakt_sync_watched: s.flag(Setting::TraktSyncWatched),
        trakt_sync_watched_back: s.flag(Setting::TraktSyncWatchedBack),

        update_frequency: s.int(Setting::LibraryUpdateFrequency),
        update_delay: s.int(Setting::LibraryUpdateDelay),
        update_auto_scan: s.flag(Setting::LibraryAutoScan),
        play_resume: s.flag(Setting::PlayResume),
        use_cloudhole: s.flag(Setting::UseCloudhole),
        cloudhole_key: secret(s, Setting::CloudholeKey),
        tmdb_api_key: secret(s, Setting::TmdbApiKey),

        osdb_user: s.text(Setting::OsdbUser),
        osdb_pass: secret(s, Setting::OsdbPass),
        osdb_language: s.text(Setting::OsdbLanguage),
        osdb_auto_language: s.flag(Setting::OsdbAutoLanguage),

        sorting_mode_movies: s.int(Setting::SortingModeMovies),
        sorting_mode_shows: s.int(Setting::SortingModeShows),
        resolution_preference_movies: s.int(Setting::ResolutionPreferenceMovies),
        resolution_preference_shows: s.int(Setting::ResolutionPreferenceShows),
        percentage_additional_seeders: s.int(Setting::PercentageAdditionalSeeders),

        use_public_dns: s.flag(Setting::UsePublicDns),
        public_dns_list: s.text(Setting::PublicDnsList),
        opennic_dns_list: s.text(Setting::OpennicDnsList),
        custom_provider_timeout_enabled: s.flag(Setting::CustomProviderTimeoutEnabled),
        custom_provider_timeout: s.int(Setting::CustomProviderTimeout),

        proxy_url: None,
        proxy_type: s.int(Setting::ProxyType),
        proxy_enabled: s.flag(Setting::ProxyEnabled),
        proxy_host: s.text(Setting::ProxyHost),
        proxy_port: s.int(Setting::ProxyPort),
        proxy_login: s.text(Setting::ProxyLogin),
        proxy_password: secret(s, Setting::ProxyPassword),

        completed_move: s.flag(Setting::CompletedMove),
        completed_movies_path: s.text(Setting::CompletedMoviesPath),
        completed_shows_path: s.text(Setting::CompletedShowsPath),
    }
}
