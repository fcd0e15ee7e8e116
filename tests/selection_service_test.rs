//! Tests for SelectionService persistence

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use flavortree::application::services::SelectionService;
use flavortree::application::ApplicationError;
use flavortree::config::{Settings, WidgetConfig};
use flavortree::domain::{DomainError, NodePath};
use flavortree::infrastructure::traits::{FileSystem, RealFileSystem};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/taxonomies")
        .join(name)
}

fn settings(data_dir: &Path) -> Settings {
    Settings {
        data_dir: data_dir.to_path_buf(),
        prune_self_named_children: true,
        widgets: BTreeMap::from([
            (
                "flavor".to_string(),
                WidgetConfig {
                    taxonomy: fixture("flavor.json"),
                    ordered: true,
                },
            ),
            (
                "body".to_string(),
                WidgetConfig {
                    taxonomy: fixture("body.toml"),
                    ordered: false,
                },
            ),
        ]),
    }
}

fn service(data_dir: &Path) -> SelectionService {
    SelectionService::new(Arc::new(RealFileSystem), Arc::new(settings(data_dir)))
}

fn path(raw: &str) -> NodePath {
    raw.parse().expect("valid path")
}

fn stored(data_dir: &Path, widget: &str) -> String {
    std::fs::read_to_string(data_dir.join(format!("{}.json", widget))).expect("stored file")
}

#[test]
fn given_toggle_when_saved_then_ordered_names_persisted_as_json_array() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");
    let service = service(&data_dir);

    // Act
    service
        .toggle("flavor", &path("Sweet > Chocolate > Dark Chocolate"))
        .unwrap();

    // Assert
    assert_eq!(
        stored(&data_dir, "flavor"),
        r#"["Sweet","Chocolate","Dark Chocolate"]"#
    );
}

#[test]
fn given_persisted_selection_when_reopened_then_state_restored() {
    let temp = TempDir::new().unwrap();
    let service = service(temp.path());
    service.toggle("flavor", &path("Floral > Jasmine")).unwrap();
    service.move_badge("flavor", 1, 0).unwrap();

    let selector = service.open("flavor").unwrap();

    assert_eq!(selector.to_stored(), ["Jasmine", "Floral"]);
    assert_eq!(selector.selected_count("Floral"), 2);
}

#[test]
fn given_legacy_colon_record_when_opening_then_leaf_names_used() {
    // Arrange
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("flavor.json"),
        r#"["Sweet","Sweet:Chocolate","Sweet:Chocolate:Dark Chocolate"]"#,
    )
    .unwrap();

    // Act
    let badges = service(temp.path()).badges("flavor").unwrap();

    // Assert
    let names: Vec<_> = badges.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Sweet", "Chocolate", "Dark Chocolate"]);
}

#[test]
fn given_legacy_bare_string_when_opening_unordered_widget_then_single_selection() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("body.json"), "Light").unwrap();

    let selector = service(temp.path()).open("body").unwrap();

    assert!(!selector.is_ordered());
    assert_eq!(selector.to_stored(), ["Light"]);
}

#[test]
fn given_unknown_widget_when_opening_then_unknown_widget_error() {
    let temp = TempDir::new().unwrap();

    let result = service(temp.path()).open("aroma");

    assert!(matches!(result, Err(ApplicationError::UnknownWidget(name)) if name == "aroma"));
}

#[test]
fn given_stale_stored_name_when_pruning_then_removed_and_saved() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("flavor.json"), r#"["Sweet","Smoky"]"#).unwrap();
    let service = service(temp.path());

    let removed = service.prune("flavor").unwrap();

    assert_eq!(removed, 1);
    assert_eq!(stored(temp.path(), "flavor"), r#"["Sweet"]"#);
}

#[test]
fn given_selection_when_clearing_then_empty_array_persisted() {
    let temp = TempDir::new().unwrap();
    let service = service(temp.path());
    service.toggle("flavor", &path("Sweet")).unwrap();

    service.clear("flavor").unwrap();

    assert_eq!(stored(temp.path(), "flavor"), "[]");
    assert_eq!(service.widgets(), ["body", "flavor"]);
}

// ============================================================
// In-memory filesystem: failed operations must not write
// ============================================================

#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
    writes: Mutex<usize>,
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        if let Some(content) = self.files.lock().unwrap().get(path) {
            return Ok(content.clone());
        }
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        *self.writes.lock().unwrap() += 1;
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || path.is_file()
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut files = self.files.lock().unwrap();
        let content = files
            .remove(from)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no staged file"))?;
        files.insert(to.to_path_buf(), content);
        Ok(())
    }
}

#[test]
fn given_invalid_path_when_toggling_then_nothing_written() {
    // Arrange
    let fs = Arc::new(MemoryFileSystem::default());
    let service = SelectionService::new(
        Arc::clone(&fs) as Arc<dyn FileSystem>,
        Arc::new(settings(Path::new("/virtual/data"))),
    );

    // Act
    let result = service.toggle("flavor", &path("Fruity > Jasmine"));

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidPath { .. }))
    ));
    assert_eq!(*fs.writes.lock().unwrap(), 0);
}

#[test]
fn given_successful_toggle_when_saving_then_state_path_written_once() {
    let fs = Arc::new(MemoryFileSystem::default());
    let service = SelectionService::new(
        Arc::clone(&fs) as Arc<dyn FileSystem>,
        Arc::new(settings(Path::new("/virtual/data"))),
    );

    service.toggle("flavor", &path("Fruity")).unwrap();

    assert_eq!(*fs.writes.lock().unwrap(), 1);
    let files = fs.files.lock().unwrap();
    assert_eq!(
        files.get(&service.state_path("flavor")).map(String::as_str),
        Some(r#"["Fruity"]"#)
    );
}
