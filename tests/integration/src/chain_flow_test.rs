//! End-to-end tests for chain assembly
//!
//! These tests exercise the complete flow: manifest directory -> plugin
//! database -> builder resolution -> serialized key set.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chain_core::{
    BackendBuilder, BackendBuilderInit, Error, GlobalPluginsBuilder, KeySet, MountBackendBuilder,
};
use chain_meta::{ManifestPluginDatabase, PluginSpec};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

fn write_manifest(dir: &Path, name: &str, body: &str) {
    let content = format!(
        "[plugin]\nname = \"{}\"\nversion = \"1.0.0\"\n{}\n",
        name, body
    );
    fs::write(dir.join(format!("{}.toml", name)), content).unwrap();
}

/// Set up a plugin directory with a realistic set of manifests
fn setup_plugins() -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    write_manifest(dir, "resolver", "[infos]\nprovides = [\"resolver\"]");
    write_manifest(
        dir,
        "resolver_fm",
        "priority = 5\n\n[infos]\nprovides = [\"resolver\"]",
    );
    write_manifest(
        dir,
        "dump",
        r#"priority = 10

[infos]
provides = ["storage"]
needs = ["resolver"]

[config]
format = "dump"
"#,
    );
    write_manifest(
        dir,
        "ini",
        r#"
[infos]
provides = ["storage"]
needs = ["resolver"]
recommends = ["sync", "journal"]

[config]
delimiter = "="
"#,
    );
    write_manifest(dir, "sync", "[infos]\nordering = [\"resolver\"]");
    write_manifest(dir, "glob", "[infos]\nordering = [\"storage\"]");
    write_manifest(
        dir,
        "type",
        "[infos]\nprovides = [\"check\"]\nmetadata = [\"check/type\"]",
    );
    write_manifest(dir, "array", "[infos]\nmetadata = [\"check/#/min\"]");
    write_manifest(
        dir,
        "crypto",
        "[infos]\nplugins = \"base64 encoding=hex\"",
    );
    write_manifest(dir, "base64", "");

    temp
}

fn open(temp: &TempDir) -> BackendBuilderInit {
    let database = ManifestPluginDatabase::open(temp.path()).unwrap();
    assert_eq!(database.len(), 10);
    BackendBuilderInit::new(Arc::new(database))
}

fn spec(name: &str) -> PluginSpec {
    PluginSpec::new(name).unwrap()
}

fn chain(builder: &BackendBuilder) -> Vec<String> {
    builder.iter().map(PluginSpec::full_name).collect()
}

#[test]
fn test_mount_backend_from_manifests() {
    let temp = setup_plugins();
    let init = open(&temp);
    let mut builder = MountBackendBuilder::new(&init);

    builder.set_mountpoint("user/app", KeySet::new()).unwrap();
    builder.add_plugin(spec("storage")).unwrap();
    builder.add_plugin(spec("glob")).unwrap();
    builder.need_metadata("check/#_1/min check/type");
    let missing = builder.resolve_needs(true).unwrap();
    builder.use_config_file("app.ecf").unwrap();

    assert!(missing.is_empty());
    assert_eq!(
        chain(&builder),
        vec![
            "glob#glob",
            "dump#storage",
            "resolver#resolver",
            "array#array",
            "type#type"
        ]
    );
    assert!(builder.validated());

    let mut ks = KeySet::new();
    builder.serialize(&mut ks).unwrap();

    let base = "system/chain/mountpoints/user\\/app";
    assert_eq!(ks[base], "user/app");
    assert_eq!(ks[&format!("{}/config/path", base)], "app.ecf");
    assert_eq!(ks[&format!("{}/plugins/#1", base)], "dump#storage");
    assert_eq!(ks[&format!("{}/plugins/#1/config/format", base)], "dump");
    assert_eq!(ks[&format!("{}/plugins/#4/name", base)], "type");
    assert!(!ks.contains_key(&format!("{}/plugins/#5", base)));
}

#[test]
fn test_exact_name_beats_higher_priority_provider() {
    let temp = setup_plugins();
    let init = open(&temp);
    let mut builder = BackendBuilder::new(&init);

    builder.add_plugin(spec("dump")).unwrap();
    builder.resolve_needs(false).unwrap();

    assert_eq!(chain(&builder), vec!["dump#dump", "resolver#resolver"]);
}

#[test]
fn test_installed_name_keeps_ref_name() {
    let temp = setup_plugins();
    let init = open(&temp);
    let mut builder = BackendBuilder::new(&init);

    builder
        .add_plugin(PluginSpec::with_ref_name("resolver", "main").unwrap())
        .unwrap();

    // "resolver" is installed, so the name is used as is
    assert_eq!(chain(&builder), vec!["resolver#main"]);
}

#[rstest]
#[case::with_recommends(true, vec!["ini#ini", "sync#sync", "resolver#resolver"], vec!["journal"])]
#[case::without_recommends(false, vec!["ini#ini", "resolver#resolver"], vec![])]
fn test_recommendations(
    #[case] add_recommends: bool,
    #[case] expected_chain: Vec<&str>,
    #[case] expected_missing: Vec<&str>,
) {
    let temp = setup_plugins();
    let init = open(&temp);
    let mut builder = BackendBuilder::new(&init);

    builder.add_plugin(spec("ini")).unwrap();
    let missing = builder.resolve_needs(add_recommends).unwrap();

    assert_eq!(chain(&builder), expected_chain);
    assert_eq!(missing, expected_missing);
}

#[test]
fn test_global_plugins_with_declared_plugins() {
    let temp = setup_plugins();
    let init = open(&temp);
    let mut builder = GlobalPluginsBuilder::new(&init);

    builder.add_plugin(spec("crypto")).unwrap();
    builder.resolve_needs(true).unwrap();

    let mut ks = KeySet::new();
    builder.serialize(&mut ks).unwrap();

    assert_eq!(ks["system/chain/globalplugins/#0"], "crypto#crypto");
    assert_eq!(ks["system/chain/globalplugins/#1"], "base64#base64");
    assert_eq!(ks["system/chain/globalplugins/#1/config/encoding"], "hex");
}

#[test]
fn test_conflicting_storages_reported_not_raised() {
    let temp = setup_plugins();
    let init = open(&temp);
    let mut builder = MountBackendBuilder::new(&init);

    builder.add_plugin(spec("dump")).unwrap();
    builder.add_plugin(spec("ini")).unwrap();
    builder.resolve_needs(false).unwrap();

    assert!(!builder.validated());
    assert!(
        builder
            .status()
            .starts_with("Could not successfully add plugin")
    );
}

#[test]
fn test_iteration_limit_stops_resolution() {
    let temp = setup_plugins();
    let init = open(&temp).with_iteration_limit(1);
    let mut builder = BackendBuilder::new(&init);

    builder.add_plugin(spec("dump")).unwrap();
    builder.need_metadata("check/type");

    let err = builder.resolve_needs(false).unwrap_err();
    assert!(matches!(err, Error::ResolutionDiverged { iterations: 1 }));
}
