use addon_config::config::{ConfigStore, ConfigurationReconciler, DnsResolvers, FixedMemory};
use addon_config::host::{FixtureHost, HostError, HostSettings};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let downloads = dir.join("downloads");
    std::fs::create_dir_all(&downloads).unwrap();

    let content = format!(
        r#"
language = "fr"

[addon]
id = "plugin.video.sample"
name = "Sample"
path = "special://home/addons/plugin.video.sample"
profile = "special://profile/addon_data/plugin.video.sample"
home = "special://home"

[platform]
os = "linux"
arch = "x64"

[paths]
"special://home" = "{root}/home"
"special://profile" = "{root}/profile"
"special://temp" = "{root}/temp"

[strings]
download_path = "{downloads}/"

[ui]
settings_open_polls = 2

[[settings]]
key = "spoof_user_agent"
type = "enum"
value = "1"

[[settings]]
key = "memory_size"
type = "slider"
option = "int"
value = "80"
"#,
        root = dir.display(),
        downloads = downloads.display(),
    );

    let path = dir.join("host.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_fixture_translates_paths() {
    let dir = TempDir::new().unwrap();
    let host = FixtureHost::load(&write_fixture(dir.path())).expect("fixture should load");

    assert_eq!(
        host.translate_path("special://profile/addon_data/x"),
        format!("{}/profile/addon_data/x", dir.path().display())
    );
    assert_eq!(host.translate_path("/already/real"), "/already/real");
    assert_eq!(host.language_code(), "fr");
}

#[test]
fn test_fixture_full_reload() {
    let dir = TempDir::new().unwrap();
    let host = FixtureHost::load(&write_fixture(dir.path())).unwrap();

    let reconciler = ConfigurationReconciler::new(
        Arc::new(host),
        ConfigStore::default(),
        Arc::new(DnsResolvers::new()),
    )
    .with_memory_probe(Arc::new(FixedMemory(0)))
    .with_health_check(None);

    let snapshot = reconciler.reload().expect("reload should succeed");

    assert_eq!(snapshot.download_path, dir.path().join("downloads"));
    assert_eq!(snapshot.language, "fr");
    assert_eq!(snapshot.spoof_user_agent, 1);
    assert_eq!(snapshot.memory_size, 80 * 1024 * 1024);
    assert_eq!(snapshot.temporary_path, dir.path().join("temp").join("sample"));
    assert!(snapshot.temporary_path.is_dir());
    assert_eq!(
        snapshot.profile_path,
        dir.path().join("profile/addon_data/plugin.video.sample")
    );

    let json = serde_json::to_value(snapshot.as_ref()).unwrap();
    assert_eq!(json["language"], "fr");
}

#[test]
fn test_missing_fixture_is_read_error() {
    let dir = TempDir::new().unwrap();
    let result = FixtureHost::load(&dir.path().join("missing.toml"));
    assert!(matches!(result, Err(HostError::Read { .. })));
}

#[test]
fn test_invalid_fixture_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "addon = 3").unwrap();

    let result = FixtureHost::load(&path);
    assert!(matches!(result, Err(HostError::Parse { .. })));
}
