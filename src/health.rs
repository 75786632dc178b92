//! Provider addon health check.
//!
//! Runs after a successful reload, in the background. Looks for an enabled
//! provider script in the addon's namespace and, when none is found, offers
//! to install the bundled provider. Never touches the published snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::host::{AddonInfo, Host, InstalledAddon};

/// Asks whether to install the bundled provider.
pub const MSG_INSTALL_PROVIDER: &str = "LOCALIZE[30271]";
/// Bundled provider installed, other providers disabled.
pub const MSG_PROVIDER_INSTALLED: &str = "LOCALIZE[30272]";
/// Bundled provider still not enabled after the install attempt.
pub const MSG_PROVIDER_FAILED: &str = "LOCALIZE[30273]";

/// Delays between host actions.
#[derive(Debug, Clone)]
pub struct HealthCheckOptions {
    /// Wait after refreshing repositories, before prompting.
    pub refresh_delay: Duration,
    /// Wait after launching the provider install, before re-listing.
    pub launch_delay: Duration,
}

impl Default for HealthCheckOptions {
    fn default() -> Self {
        Self {
            refresh_delay: Duration::from_secs(10),
            launch_delay: Duration::from_secs(4),
        }
    }
}

/// Outcome of one provider check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCheck {
    /// At least one provider in the namespace is enabled.
    Enabled,
    /// The user declined installing the bundled provider.
    Declined,
    /// Bundled provider installed; lists the providers that were disabled.
    Installed { disabled: Vec<String> },
    InstallFailed,
}

/// Id prefix shared by the addon's provider scripts ("script.foo.").
pub fn provider_namespace(info: &AddonInfo) -> String {
    format!("script.{}.", info.short_name())
}

/// Id of the provider bundled with the addon ("script.foo.burst").
pub fn bundled_provider_id(info: &AddonInfo) -> String {
    format!("{}burst", provider_namespace(info))
}

fn dialog_title(info: &AddonInfo) -> &str {
    if info.name.is_empty() {
        &info.id
    } else {
        &info.name
    }
}

/// Runs the provider check on the calling thread.
pub fn check_providers<H: Host + ?Sized>(
    host: &H,
    info: &AddonInfo,
    icon: &Path,
    options: &HealthCheckOptions,
) -> ProviderCheck {
    let namespace = provider_namespace(info);
    let providers: Vec<InstalledAddon> = host
        .script_addons()
        .into_iter()
        .filter(|addon| addon.id.starts_with(&namespace))
        .collect();

    if providers.iter().any(|addon| addon.enabled) {
        tracing::debug!("Found enabled providers under {}", namespace);
        return ProviderCheck::Enabled;
    }

    tracing::info!("Updating add-on repositories for providers...");
    host.update_local_addons();
    host.update_addon_repos();
    thread::sleep(options.refresh_delay);

    let title = dialog_title(info);
    if !host.confirm_dialog(title, MSG_INSTALL_PROVIDER) {
        return ProviderCheck::Declined;
    }

    let provider_id = bundled_provider_id(info);
    host.play_url(&format!("plugin://{}/", provider_id));
    thread::sleep(options.launch_delay);

    let installed = host
        .script_addons()
        .iter()
        .any(|addon| addon.id == provider_id && addon.enabled);
    if !installed {
        tracing::warn!("Provider {} is still not enabled", provider_id);
        host.show_dialog(title, MSG_PROVIDER_FAILED);
        return ProviderCheck::InstallFailed;
    }

    let disabled: Vec<String> = providers.into_iter().map(|addon| addon.id).collect();
    for id in &disabled {
        host.set_addon_enabled(id, false);
    }
    host.notify(title, MSG_PROVIDER_INSTALLED, icon);
    tracing::info!("Installed {}, disabled {} other providers", provider_id, disabled.len());

    ProviderCheck::Installed { disabled }
}

/// Starts the provider check on a background thread.
///
/// Returns `None` if the thread could not be started.
pub fn spawn_provider_check(
    host: Arc<dyn Host>,
    info: AddonInfo,
    icon: PathBuf,
    options: HealthCheckOptions,
) -> Option<JoinHandle<ProviderCheck>> {
    let spawned = thread::Builder::new()
        .name("provider-check".to_string())
        .spawn(move || check_providers(host.as_ref(), &info, &icon, &options));

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Failed to start provider check: {}", e);
            None
        }
    }
}
