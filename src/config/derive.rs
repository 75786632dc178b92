//! Derived configuration values.
//!
//! Rules run in a fixed order on a snapshot that has not been published
//! yet; later rules may depend on overrides made by earlier ones.

use crate::config::dns::{strip_whitespace, DnsResolvers, ResolverCategory};
use crate::config::memory::human_bytes;
use crate::config::types::{Configuration, SecureString, KEEP_ALWAYS, STORAGE_MEMORY};

const MIB: i64 = 1024 * 1024;

/// Budget used by auto-sizing strategy 0.
pub const FIXED_MEMORY_SIZE: i64 = 40 * MIB;

/// Ceiling for automatically selected memory sizes.
pub const MAX_AUTO_MEMORY_SIZE: i64 = 200 * MIB;

/// Sync interval, in hours, used when a token exists but no interval is set.
pub const DEFAULT_TRAKT_SYNC_FREQUENCY: i64 = 6;

pub const DEFAULT_CONNECTIONS_LIMIT: i64 = 50;

/// Proxy protocols, indexed by the `proxy_type` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyType {
    Socks4,
    Socks5,
    Http,
    Https,
}

impl ProxyType {
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Socks4),
            1 => Some(Self::Socks5),
            2 => Some(Self::Http),
            3 => Some(Self::Https),
            _ => None,
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Socks4 => "socks4",
            Self::Socks5 => "socks5",
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Memory budget for memory-backed storage.
///
/// Strategy 0 is a fixed 40 MiB. Strategy `s` takes `5 + 5(s - 1)` percent
/// of `total_memory`; a zero result, or a strategy whose percentage is not
/// positive or does not fit an `i64`, keeps `configured`. The outcome never
/// exceeds [`MAX_AUTO_MEMORY_SIZE`].
pub fn auto_memory_size(strategy: i64, total_memory: u64, configured: i64) -> i64 {
    if strategy == 0 {
        return FIXED_MEMORY_SIZE;
    }

    let mut size = configured;
    let pct = strategy
        .checked_sub(1)
        .and_then(|s| s.checked_mul(5))
        .and_then(|p| p.checked_add(5));
    if let Some(pct) = pct.filter(|p| *p > 0) {
        let selected = (total_memory / 100).saturating_mul(pct as u64);
        if selected > 0 {
            size = i64::try_from(selected).unwrap_or(i64::MAX);
        }
    }

    tracing::debug!("Total system memory: {}", human_bytes(total_memory));
    tracing::debug!(
        "Automatically selected memory size: {}",
        human_bytes(size.max(0) as u64)
    );

    if size > MAX_AUTO_MEMORY_SIZE {
        tracing::debug!(
            "Selected memory size ({}) is bigger than maximum for auto-select, using {}",
            human_bytes(size as u64),
            human_bytes(MAX_AUTO_MEMORY_SIZE as u64)
        );
        size = MAX_AUTO_MEMORY_SIZE;
    }
    size
}

/// Assembles `scheme://[login[:password]@]host:port`.
///
/// Returns `None` for an unknown proxy type.
pub fn proxy_url(
    proxy_type: i64,
    host: &str,
    port: i64,
    login: &str,
    password: &str,
) -> Option<String> {
    let Some(kind) = ProxyType::from_index(proxy_type) else {
        tracing::warn!("Unknown proxy type {}, proxy disabled", proxy_type);
        return None;
    };

    let mut url = format!("{}://", kind.scheme());
    if !login.is_empty() || !password.is_empty() {
        url.push_str(&format!("{}:{}@", login, password));
    }
    url.push_str(&format!("{}:{}", host, port));
    Some(url)
}

/// Memory-backed storage cannot move or keep files on disk.
fn apply_storage_mode(config: &mut Configuration) {
    if config.download_storage != STORAGE_MEMORY {
        return;
    }
    config.completed_move = false;
    config.keep_downloading = KEEP_ALWAYS;
    config.keep_files_finished = KEEP_ALWAYS;
    config.keep_files_playing = KEEP_ALWAYS;
}

fn apply_memory_size(config: &mut Configuration, total_memory: u64) {
    if config.download_storage != STORAGE_MEMORY || !config.auto_memory_size {
        return;
    }
    config.memory_size = auto_memory_size(
        config.auto_memory_size_strategy,
        total_memory,
        config.memory_size,
    );
}

fn apply_trakt_defaults(config: &mut Configuration) {
    if !config.trakt_token.is_empty() && config.trakt_sync_frequency == 0 {
        config.trakt_sync_frequency = DEFAULT_TRAKT_SYNC_FREQUENCY;
    }
}

fn apply_subtitle_language(config: &mut Configuration) {
    if config.osdb_auto_language || config.osdb_language.is_empty() {
        config.osdb_language = config.language.clone();
    }
}

fn apply_proxy(config: &mut Configuration) {
    if !config.proxy_enabled || config.proxy_host.is_empty() {
        return;
    }
    config.proxy_url = proxy_url(
        config.proxy_type,
        &config.proxy_host,
        config.proxy_port,
        &config.proxy_login,
        config.proxy_password.expose(),
    )
    .map(SecureString::new);
}

fn apply_resolvers(config: &mut Configuration, resolvers: &DnsResolvers) {
    config.public_dns_list = strip_whitespace(&config.public_dns_list);
    resolvers.rebuild(ResolverCategory::Public, &config.public_dns_list);

    config.opennic_dns_list = strip_whitespace(&config.opennic_dns_list);
    resolvers.rebuild(ResolverCategory::Opennic, &config.opennic_dns_list);
}

fn apply_connections_limit(config: &mut Configuration) {
    if config.connections_limit == 0 {
        config.connections_limit = DEFAULT_CONNECTIONS_LIMIT;
    }
}

/// Applies every derivation rule, in order, to an unpublished snapshot.
pub fn apply_derived(config: &mut Configuration, total_memory: u64, resolvers: &DnsResolvers) {
    apply_storage_mode(config);
    apply_memory_size(config, total_memory);
    apply_trakt_defaults(config);
    apply_subtitle_language(config);
    apply_proxy(config);
    apply_resolvers(config, resolvers);
    apply_connections_limit(config);
}
