//! Reading raw content from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{LoadError, LoadResult};
use crate::raw::RawContent;

/// Manifest file of a world directory.
pub const MANIFEST_FILE: &str = "world.json";
/// Item definitions file.
pub const ITEMS_FILE: &str = "items.json";
/// Location definitions file.
pub const LOCATIONS_FILE: &str = "locations.json";
/// Starting inventory file. Optional.
pub const INVENTORY_FILE: &str = "inventory.json";
/// Declared choices file. Optional.
pub const CHOICES_FILE: &str = "choices.json";

/// A source of raw content.
pub trait Loader {
    /// Read the whole bundle.
    fn load(&self) -> LoadResult<RawContent>;

    /// Where the content comes from, for messages.
    fn source(&self) -> &Path;
}

/// Reads a world directory with one JSON file per section.
#[derive(Debug, Clone)]
pub struct JsonDirLoader {
    dir: PathBuf,
}

impl JsonDirLoader {
    /// Create a loader for `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Loader for JsonDirLoader {
    fn load(&self) -> LoadResult<RawContent> {
        debug!(dir = %self.dir.display(), "reading world directory");
        Ok(RawContent {
            manifest: read_json(&self.dir.join(MANIFEST_FILE))?,
            items: read_json(&self.dir.join(ITEMS_FILE))?,
            locations: read_json(&self.dir.join(LOCATIONS_FILE))?,
            inventory: read_optional(&self.dir.join(INVENTORY_FILE))?,
            choices: read_optional(&self.dir.join(CHOICES_FILE))?,
        })
    }

    fn source(&self) -> &Path {
        &self.dir
    }
}

/// Reads a single JSON file holding every section.
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    /// Create a loader for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Loader for JsonFileLoader {
    fn load(&self) -> LoadResult<RawContent> {
        debug!(file = %self.path.display(), "reading world file");
        read_json(&self.path)
    }

    fn source(&self) -> &Path {
        &self.path
    }
}

/// Pick a loader by path: directories use [`JsonDirLoader`], anything
/// else [`JsonFileLoader`].
pub fn loader_for(path: &Path) -> Box<dyn Loader> {
    if path.is_dir() {
        Box::new(JsonDirLoader::new(path))
    } else {
        Box::new(JsonFileLoader::new(path))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional<T: DeserializeOwned + Default>(path: &Path) -> LoadResult<T> {
    if path.exists() {
        read_json(path)
    } else {
        Ok(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, text: &str) {
        fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn dir_loader_reads_every_section() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), MANIFEST_FILE, r#"{"name": "Tiny", "start": "attic"}"#);
        write(dir.path(), ITEMS_FILE, r#"{"rusty_key": {"name": "rusty key"}}"#);
        write(dir.path(), LOCATIONS_FILE, r#"{"attic": {"name": "Attic"}}"#);
        write(
            dir.path(),
            INVENTORY_FILE,
            r#"{"items": [{"item": "rusty_key", "qty": 1}]}"#,
        );

        let raw = JsonDirLoader::new(dir.path()).load().unwrap();
        assert_eq!(raw.manifest.name, "Tiny");
        assert_eq!(raw.manifest.start.as_deref(), Some("attic"));
        assert!(raw.items.contains_key("rusty_key"));
        assert_eq!(raw.inventory.items.len(), 1);
        assert!(raw.choices.is_empty());
    }

    #[test]
    fn missing_required_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), MANIFEST_FILE, r#"{"name": "Tiny"}"#);

        let err = JsonDirLoader::new(dir.path()).load().unwrap_err();
        match err {
            LoadError::Io { path, .. } => assert!(path.ends_with(ITEMS_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().starts_with("malformed content in"));
    }

    #[test]
    fn loader_for_picks_by_path_kind() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(loader_for(dir.path()).source(), dir.path());

        let file = dir.path().join("bundle.json");
        fs::write(&file, r#"{"manifest": {"name": "Bundle"}}"#).unwrap();
        let raw = loader_for(&file).load().unwrap();
        assert_eq!(raw.manifest.name, "Bundle");
    }
}
