use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use addon_config::bootstrap::{reload_or_reject, SETTINGS_POLL_INTERVAL};
use addon_config::config::schema::validate_schema;
use addon_config::config::{ConfigStore, ConfigurationReconciler, DnsResolvers};
use addon_config::host::{FixtureHost, HostSettings};
use addon_config::logging::init_tracing;
use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "addon-config", version, about = "Reconcile host addon settings into a configuration snapshot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one reload against a host fixture and print the snapshot.
    Reload {
        /// TOML file describing the host.
        #[arg(long)]
        host: PathBuf,
        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
        /// Seconds between settings-window polls after a rejected reload.
        #[arg(long, default_value_t = SETTINGS_POLL_INTERVAL.as_secs())]
        poll_secs: u64,
    },
    /// Compare the fixture's settings against the schema.
    Schema {
        #[arg(long)]
        host: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Reload {
            host,
            json,
            poll_secs,
        } => {
            let host = FixtureHost::load(&host)?;
            let reconciler = ConfigurationReconciler::new(
                Arc::new(host),
                ConfigStore::default(),
                Arc::new(DnsResolvers::new()),
            )
            .with_health_check(None);

            let snapshot = match reload_or_reject(&reconciler, Duration::from_secs(poll_secs)) {
                Ok(snapshot) => snapshot,
                Err(code) => std::process::exit(code),
            };

            if json {
                let rendered = serde_json::to_string_pretty(snapshot.as_ref())
                    .context("Failed to serialize configuration")?;
                println!("{}", rendered);
            } else {
                println!("{:#?}", snapshot);
            }
        }
        Command::Schema { host } => {
            let host = FixtureHost::load(&host)?;
            let report = validate_schema(&host.all_settings());
            if report.is_clean() {
                println!("All settings match the schema.");
            }
            for setting in &report.missing {
                println!("missing: {}", setting.as_str());
            }
            for (setting, declared) in &report.mismatched {
                println!(
                    "mismatched: {} declared '{}', expected {:?}",
                    setting.as_str(),
                    declared,
                    setting.kind()
                );
            }
        }
    }

    Ok(())
}
