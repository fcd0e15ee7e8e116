//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Scalars: the higher layer wins when it sets a value
//! - Widgets: merged by name, fields left out inherit from the lower layer
//!
//! These tests pass explicit files to `Settings::load_from` so a real global
//! config on the machine does not leak in.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use flavortree::application::ApplicationError;
use flavortree::config::{local_config_path, Settings};

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_local_config_with_widget_when_load_then_taxonomy_resolved_against_config_dir() {
    // Arrange
    let project = TempDir::new().unwrap();
    let local = write_config(
        &project,
        ".flavortree.toml",
        r#"
[widgets.flavor]
taxonomy = "taxonomies/flavor.json"
"#,
    );

    // Act
    let settings = Settings::load_from(None, Some(&local)).expect("load settings");

    // Assert
    let flavor = &settings.widgets["flavor"];
    assert_eq!(flavor.taxonomy, project.path().join("taxonomies/flavor.json"));
    assert!(flavor.ordered, "ordered defaults to true");
}

#[test]
fn given_global_and_local_when_load_then_local_overrides_by_widget() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let global = write_config(
        &temp,
        "global/flavortree.toml",
        r#"
data_dir = "/srv/flavortree"
prune_self_named_children = false

[widgets.flavor]
taxonomy = "/wheels/flavor.json"

[widgets.body]
taxonomy = "/wheels/body.toml"
ordered = false
"#,
    );
    let local = write_config(
        &temp,
        "project/.flavortree.toml",
        r#"
[widgets.flavor]
ordered = false

[widgets.adjectives]
taxonomy = "/wheels/adjectives.json"
"#,
    );

    // Act
    let settings = Settings::load_from(Some(&global), Some(&local)).expect("load settings");

    // Assert
    assert_eq!(settings.data_dir, PathBuf::from("/srv/flavortree"));
    assert!(!settings.prune_self_named_children);
    assert_eq!(
        settings.widgets.keys().collect::<Vec<_>>(),
        ["adjectives", "body", "flavor"]
    );
    assert_eq!(
        settings.widgets["flavor"].taxonomy,
        PathBuf::from("/wheels/flavor.json")
    );
    assert!(!settings.widgets["flavor"].ordered);
    assert!(!settings.widgets["body"].ordered);
}

#[test]
fn given_malformed_toml_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let local = write_config(&temp, ".flavortree.toml", "widgets = [not toml");

    let result = Settings::load_from(None, Some(&local));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_settings_when_serialized_then_round_trips_through_local_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let first = write_config(
        &temp,
        ".flavortree.toml",
        r#"
data_dir = "/srv/flavortree"

[widgets.body]
taxonomy = "/wheels/body.toml"
ordered = false
"#,
    );
    let settings = Settings::load_from(None, Some(&first)).unwrap();

    // Act
    let shown = settings.to_toml().unwrap();
    let second = write_config(&temp, "copy/.flavortree.toml", &shown);
    let reloaded = Settings::load_from(None, Some(&second)).unwrap();

    // Assert
    assert_eq!(reloaded, settings);
}

#[test]
fn given_project_dir_when_locating_local_config_then_dotfile_in_dir() {
    let temp = TempDir::new().unwrap();

    assert_eq!(
        local_config_path(temp.path()),
        temp.path().join(".flavortree.toml")
    );
}
