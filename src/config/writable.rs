//! Directory writability probe.

use std::fs::{self, File};
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::paths::UNSET_PATH;

const NETWORK_PREFIXES: &[&str] = &["nfs", "smb"];
const PROBE_FILE: &str = ".writable";

/// Verifies that `path` is an existing, writable, local directory.
///
/// Creates and removes a marker file inside the directory.
pub fn check_writable(path: &str) -> Result<(), ConfigError> {
    if path == UNSET_PATH {
        return Err(ConfigError::PathNotSet);
    }
    if NETWORK_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return Err(ConfigError::UnsupportedNetworkPath {
            path: path.to_string(),
        });
    }

    let dir = Path::new(path);
    let metadata = fs::metadata(dir).map_err(|e| ConfigError::Filesystem {
        path: dir.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(ConfigError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let probe = dir.join(PROBE_FILE);
    File::create(&probe).map_err(|e| ConfigError::Filesystem {
        path: probe.clone(),
        source: e,
    })?;
    scopeguard::defer! {
        if let Err(e) = fs::remove_file(&probe) {
            tracing::warn!("Failed to remove probe file {}: {}", probe.display(), e);
        }
    }

    Ok(())
}
