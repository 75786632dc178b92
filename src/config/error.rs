use std::path::PathBuf;

use thiserror::Error;

/// Localized host message shown when no download path is configured.
pub const MSG_DOWNLOAD_PATH_NOT_SET: &str = "LOCALIZE[30113]";

/// Errors raised while validating a configured directory.
///
/// These are the only errors allowed to abort a reload.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Path not set")]
    PathNotSet,

    #[error("Network paths are not supported, change {path} to a locally mounted path by the OS")]
    UnsupportedNetworkPath { path: String },

    #[error("{} is not a valid directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Cannot access '{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A reload rejected during path validation.
#[derive(Debug, Error)]
#[error("Invalid {setting}: {source}")]
pub struct ReloadError {
    /// Setting key whose value was rejected.
    pub setting: &'static str,
    #[source]
    pub source: ConfigError,
}

impl ReloadError {
    pub fn new(setting: &'static str, source: ConfigError) -> Self {
        Self { setting, source }
    }

    /// Text to show the user before sending them to the settings window.
    pub fn user_message(&self) -> String {
        match self.source {
            ConfigError::PathNotSet => MSG_DOWNLOAD_PATH_NOT_SET.to_string(),
            ref other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_unset_path() {
        let err = ReloadError::new("download_path", ConfigError::PathNotSet);
        assert_eq!(err.user_message(), MSG_DOWNLOAD_PATH_NOT_SET);
    }

    #[test]
    fn test_user_message_uses_error_text() {
        let err = ReloadError::new(
            "library_path",
            ConfigError::NotADirectory {
                path: PathBuf::from("/srv/library"),
            },
        );
        assert_eq!(err.user_message(), "/srv/library is not a valid directory");
        assert!(err.to_string().contains("library_path"));
    }
}
