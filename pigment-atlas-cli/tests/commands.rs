//! Integration tests for the import, build and config commands

use pigment_atlas::config::AtlasConfig;
use pigment_atlas_cli::{BuildCommand, ConfigCommand, ImportCommand};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ACME: &str = r#"{"Acme": [{"Red": [["PR101","Red Iron Oxide"]],
    "Purple": [["PR101","Red Iron Oxide"],["PB29","Ultramarine"]]}]}"#;

/// Helper to create a config with its database and build root under `dir`
fn test_config(dir: &Path) -> AtlasConfig {
    let mut config = AtlasConfig::default();
    config.database.url = format!("sqlite://{}", dir.join("pigments.sqlite3").display());
    config.site.output_dir = dir.join("build");
    config
}

fn write_source(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("pigments.json");
    fs::write(&path, ACME).unwrap();
    path
}

#[tokio::test]
async fn test_import_then_build() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());

    let import = ImportCommand::new(write_source(temp.path()), None).unwrap();
    let report = import.run(&config).await.unwrap();
    assert_eq!(report.summary.manufacturers, 1);
    assert_eq!(report.summary.paints, 2);
    assert_eq!(report.summary.pigments, 2);
    assert_eq!(report.notes, 0);

    let built = BuildCommand::default().run(&config).await.unwrap();
    assert_eq!(built.pages, 7);
    assert!(temp.path().join("build/pigments/pb29-ultramarine.html").is_file());
}

#[tokio::test]
async fn test_reimport_replaces_catalog() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());

    ImportCommand::new(write_source(temp.path()), None)
        .unwrap()
        .run(&config)
        .await
        .unwrap();

    let smaller = temp.path().join("smaller.json");
    fs::write(&smaller, r#"{"Bolt": [{"Blue": [["PB29","Ultramarine"]]}]}"#).unwrap();
    ImportCommand::new(smaller, None).unwrap().run(&config).await.unwrap();

    let built = BuildCommand::default().run(&config).await.unwrap();
    // home, pigment index, Bolt's paint index, Blue, PB29
    assert_eq!(built.pages, 5);
    assert!(!temp.path().join("build/paints/acme").exists());
}

#[tokio::test]
async fn test_import_applies_notes() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());
    let notes = temp.path().join("notes.json");
    fs::write(
        &notes,
        r#"[{"code": "PB29", "name": "Ultramarine", "description": "Sodium aluminium sulfosilicate"}]"#,
    )
    .unwrap();

    let report = ImportCommand::new(write_source(temp.path()), Some(notes))
        .unwrap()
        .run(&config)
        .await
        .unwrap();
    assert_eq!(report.notes, 1);

    BuildCommand::default().run(&config).await.unwrap();
    let page = fs::read_to_string(temp.path().join("build/pigments/pb29-ultramarine.html")).unwrap();
    assert!(page.contains("Sodium aluminium sulfosilicate"));
}

#[tokio::test]
async fn test_failed_notes_keep_previous_catalog() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());
    ImportCommand::new(write_source(temp.path()), None)
        .unwrap()
        .run(&config)
        .await
        .unwrap();

    let smaller = temp.path().join("smaller.json");
    fs::write(&smaller, r#"{"Bolt": [{"Blue": [["PB29","Ultramarine"]]}]}"#).unwrap();
    let notes = temp.path().join("notes.json");
    fs::write(&notes, r#"[{"code": "PR101", "name": "Red Iron Oxide"}]"#).unwrap();

    let result = ImportCommand::new(smaller, Some(notes)).unwrap().run(&config).await;
    assert!(result.is_err());

    let built = BuildCommand::default().run(&config).await.unwrap();
    assert_eq!(built.pages, 7);
    assert!(temp.path().join("build/paints/acme/index.html").is_file());
}

#[tokio::test]
async fn test_build_from_json_with_overrides() {
    let temp = TempDir::new().unwrap();
    let config = test_config(temp.path());
    let cmd = BuildCommand {
        json: Some(write_source(temp.path())),
        output: Some(temp.path().join("public")),
        root_path: Some("/atlas".to_string()),
    };

    let report = cmd.run(&config).await.unwrap();

    assert_eq!(report.output_dir, temp.path().join("public"));
    let index = fs::read_to_string(temp.path().join("public/index.html")).unwrap();
    assert!(index.contains(r#"href="/atlas/paints/acme/index.html""#));
    // the database is never opened
    assert!(!temp.path().join("pigments.sqlite3").exists());
}

#[tokio::test]
async fn test_build_refuses_to_clean_a_root_holding_its_inputs() {
    let temp = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    let config = test_config(store.path());
    let json = write_source(temp.path());
    let cmd = BuildCommand {
        json: Some(json.clone()),
        output: Some(temp.path().to_path_buf()),
        root_path: None,
    };

    let result = cmd.run(&config).await;
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&json).unwrap(), ACME);
    assert!(!temp.path().join("index.html").exists());
}

#[test]
fn test_import_requires_existing_file() {
    let temp = TempDir::new().unwrap();
    let result = ImportCommand::new(temp.path().join("missing.json"), None);
    assert!(result.is_err());
}

#[test]
fn test_config_renders_as_toml() {
    let rendered = ConfigCommand::render(&AtlasConfig::default()).unwrap();
    assert!(rendered.contains("[site]"));
    assert!(rendered.contains(r#"output_dir = "build""#));
    assert!(rendered.contains(r#"format = "pretty""#));
}
