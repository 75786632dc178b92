//! Host path translation and platform-specific path quirks.
//!
//! Directory settings are translated through the host and reduced to their
//! directory component, since translation may hand back a file-like token.
//! Platform quirks are a small table keyed by OS name; each entry rewrites
//! an [`AddonInfo`] and can be tested on its own.

use std::fs;
use std::io;
use std::path::{is_separator, Path, PathBuf};

use crate::host::{AddonInfo, HostSettings, Platform};

/// Value a directory setting resolves to when it was never configured.
pub const UNSET_PATH: &str = ".";

const HOST_TEMP_DIR: &str = "special://temp";
const STORE_PACKAGE_MARKER: &str = "XBMCFoundation";
const STORE_PACKAGE_ROOT: &str = "Packages/XBMCFoundation.Kodi_4n2hpmxwrvr6p/LocalCache/Roaming/Kodi";
const ANDROID_PRIMARY_STORAGE: &str = "/storage/emulated/0";
const ANDROID_LEGACY_STORAGE: &str = "/storage/emulated/legacy";

/// Directory part of `path`, keeping everything up to the last separator.
///
/// A trailing separator makes the path its own directory, so
/// `"/media/downloads/"` stays `"/media/downloads"`. Paths without any
/// separator resolve to [`UNSET_PATH`].
pub fn dir_component(path: &str) -> String {
    let Some(last) = path.rfind(is_separator) else {
        return UNSET_PATH.to_string();
    };

    let dir = path[..=last].trim_end_matches(is_separator);
    if dir.is_empty() {
        // Root: keep the separator itself.
        return path[..=last][..1].to_string();
    }
    dir.to_string()
}

/// Translates a directory setting into a real directory path.
pub fn translate_dir<H: HostSettings + ?Sized>(host: &H, path: &str) -> String {
    dir_component(&host.translate_path(path))
}

/// Joins a possibly absolute tail onto `root`, treating the tail as relative.
fn rebase(root: &Path, tail: &str) -> String {
    root.join(tail.trim_start_matches(is_separator))
        .to_string_lossy()
        .into_owned()
}

/// Filesystem facts the platform quirks probe.
#[derive(Debug, Clone)]
pub struct QuirkContext {
    /// Candidate data roots for store-packaged Windows installs, in order.
    pub store_roots: Vec<PathBuf>,
    pub android_primary: String,
    pub android_legacy: String,
}

impl Default for QuirkContext {
    fn default() -> Self {
        let mut store_roots = Vec::new();
        if let Some(local) = dirs::data_local_dir() {
            store_roots.push(local.join(STORE_PACKAGE_ROOT));
        }
        if let Some(roaming) = dirs::data_dir() {
            store_roots.push(roaming.join("kodi"));
        }

        Self {
            store_roots,
            android_primary: ANDROID_PRIMARY_STORAGE.to_string(),
            android_legacy: ANDROID_LEGACY_STORAGE.to_string(),
        }
    }
}

/// A path rewrite applied on one platform.
pub struct PlatformQuirk {
    /// OS name, compared case-insensitively.
    pub os: &'static str,
    pub apply: fn(AddonInfo, &QuirkContext) -> AddonInfo,
}

/// Quirks applied during path resolution, in order.
pub const PLATFORM_QUIRKS: &[PlatformQuirk] = &[
    PlatformQuirk {
        os: "windows",
        apply: windows_store_install,
    },
    PlatformQuirk {
        os: "android",
        apply: android_legacy_storage,
    },
];

/// Store-packaged installs report a sandboxed home; re-root every addon
/// path under the first real data root that holds this addon's data.
pub fn windows_store_install(mut info: AddonInfo, ctx: &QuirkContext) -> AddonInfo {
    if !info.xbmc.contains(STORE_PACKAGE_MARKER) {
        return info;
    }

    let addon_data = Path::new("userdata").join("addon_data").join(&info.id);
    let Some(root) = ctx
        .store_roots
        .iter()
        .find(|root| fs::metadata(root.join(&addon_data)).is_ok())
    else {
        return info;
    };

    let home = info.home.clone();
    let strip = |path: &str| path.replacen(&home, "", 1);

    info.path = rebase(root, &strip(&info.path));
    info.profile = rebase(root, &strip(&info.profile));
    info.temp_path = rebase(root, &strip(&info.temp_path));
    info.icon = rebase(root, &strip(&info.icon));
    info.home = root.to_string_lossy().into_owned();

    tracing::info!("Using store-packaged data root {}", info.home);
    info
}

/// Prefer the legacy mount of the primary storage when it exists.
pub fn android_legacy_storage(mut info: AddonInfo, ctx: &QuirkContext) -> AddonInfo {
    let legacy_path = info
        .path
        .replacen(&ctx.android_primary, &ctx.android_legacy, 1);
    if fs::metadata(&legacy_path).is_err() {
        return info;
    }

    info.path = legacy_path;
    info.profile = info
        .profile
        .replacen(&ctx.android_primary, &ctx.android_legacy, 1);

    tracing::info!("Using {} path.", ctx.android_legacy);
    info
}

/// Runs every quirk registered for `platform`.
pub fn apply_platform_quirks(
    mut info: AddonInfo,
    platform: Option<&Platform>,
    ctx: &QuirkContext,
) -> AddonInfo {
    let Some(platform) = platform else {
        return info;
    };

    for quirk in PLATFORM_QUIRKS {
        if platform.os.eq_ignore_ascii_case(quirk.os) {
            info = (quirk.apply)(info, ctx);
        }
    }
    info
}

/// Removes and recreates the scratch directory.
pub fn recreate_temp_dir(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::debug!("Could not clear temporary directory {}: {}", path.display(), e),
    }
    fs::create_dir_all(path)
}

/// Resolves the addon's real paths.
///
/// Translates every host-reported path, derives the scratch directory,
/// applies platform quirks, and recreates the scratch directory.
pub fn resolve_addon_info<H: HostSettings + ?Sized>(
    host: &H,
    platform: Option<&Platform>,
    ctx: &QuirkContext,
) -> AddonInfo {
    let mut info = host.addon_info();
    info.path = host.translate_path(&info.path);
    info.profile = host.translate_path(&info.profile);
    info.home = host.translate_path(&info.home);
    info.xbmc = host.translate_path(&info.xbmc);
    info.temp_path = Path::new(&host.translate_path(HOST_TEMP_DIR))
        .join(info.short_name())
        .to_string_lossy()
        .into_owned();

    let info = apply_platform_quirks(info, platform, ctx);

    if let Err(e) = recreate_temp_dir(Path::new(&info.temp_path)) {
        tracing::info!("Could not create temporary directory: {}", e);
    }
    info
}
