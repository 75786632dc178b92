//! Process bootstrap around a reload.
//!
//! A rejected configuration is handed back to the user: the settings window
//! is opened, the reason shown, and once the window is closed the process
//! is expected to exit with [`EXIT_CONFIG_REJECTED`] so a supervisor can
//! tell it apart from a crash.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::{ConfigurationReconciler, Configuration, ReloadError};
use crate::host::{Host, HostUi};

/// Exit status for "configuration rejected by user".
pub const EXIT_CONFIG_REJECTED: i32 = 5;

/// How often the settings window is polled while waiting for it to close.
pub const SETTINGS_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Blocks until the host reports the settings window as closed.
pub fn wait_for_settings_closed<H: HostUi + ?Sized>(ui: &H, interval: Duration) {
    loop {
        thread::sleep(interval);
        if !ui.is_settings_open() {
            return;
        }
    }
}

/// Sends the user to the settings window with the rejection reason.
///
/// Returns the exit status the process should terminate with.
pub fn reject_configuration<H: Host + ?Sized>(
    host: &H,
    error: &ReloadError,
    poll_interval: Duration,
) -> i32 {
    tracing::warn!(
        "Addon settings not properly set, opening settings window: {}",
        error
    );

    let info = host.addon_info();
    let title = if info.name.is_empty() { &info.id } else { &info.name };

    host.open_settings();
    host.show_dialog(title, &error.user_message());
    wait_for_settings_closed(host, poll_interval);

    EXIT_CONFIG_REJECTED
}

/// Reloads, or runs the rejection flow and returns its exit status.
pub fn reload_or_reject(
    reconciler: &ConfigurationReconciler,
    poll_interval: Duration,
) -> Result<Arc<Configuration>, i32> {
    reconciler
        .reload()
        .map_err(|e| reject_configuration(reconciler.host().as_ref(), &e, poll_interval))
}
