//! Filesystem boundary used by the taxonomy and selection services
//!
//! Services only see this trait, so tests can swap in an in-memory store.

use std::io;
use std::path::{Path, PathBuf};

/// Filesystem operations needed to load taxonomies and persist selections.
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write `content`, replacing any existing file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Move `from` onto `to`. Defaults to copy, overwrite, then remove `from`
    /// for stores without a native rename.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let content = self.read_to_string(from)?;
        self.write(to, &content)?;
        self.remove_file(from)
    }

    /// Create the directory a file will live in.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.create_dir_all(parent),
            _ => Ok(()),
        }
    }

    /// Write through a sibling temp file so readers never see a half-written record.
    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()> {
        self.ensure_parent(path)?;
        let staging = staging_path(path);
        self.write(&staging, content)?;
        self.rename(&staging, path)
    }
}

/// `<name>.tmp` next to `path`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Filesystem backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Store without a native rename.
    #[derive(Default)]
    struct MapFileSystem {
        files: Mutex<HashMap<PathBuf, String>>,
    }

    impl FileSystem for MapFileSystem {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }

        fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }

        fn is_file(&self, path: &Path) -> bool {
            self.exists(path)
        }

        fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }

        fn remove_file(&self, path: &Path) -> io::Result<()> {
            self.files
                .lock()
                .unwrap()
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    #[test]
    fn given_store_without_rename_when_writing_atomically_then_no_staging_file_left() {
        let fs = MapFileSystem::default();
        let target = Path::new("/data/flavor.json");

        fs.write_atomic(target, "[\"Floral\"]").unwrap();

        assert_eq!(fs.read_to_string(target).unwrap(), "[\"Floral\"]");
        assert!(!fs.exists(&staging_path(target)));
        assert_eq!(fs.files.lock().unwrap().len(), 1);
    }

    #[test]
    fn given_missing_parent_when_writing_atomically_then_created_without_leftovers() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested/flavor.json");

        RealFileSystem.write_atomic(&target, "[\"Sweet\"]").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "[\"Sweet\"]");
        assert!(!staging_path(&target).exists());
    }

    #[test]
    fn given_file_path_when_staging_then_tmp_suffix_appended() {
        assert_eq!(
            staging_path(Path::new("/data/body.json")),
            PathBuf::from("/data/body.json.tmp")
        );
    }
}
