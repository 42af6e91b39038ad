use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use super::records::Record;
use super::CollectionStore;
use crate::error::Result;

/// Store keeping each collection in its own pretty-printed JSON file
/// (`tasks.json`, `projects.json`, `focuses.json`, `reflections.json`,
/// `wiki.json`) inside one directory.
///
/// Files are read on every fetch, so a corrupt file only fails the
/// collection it holds.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Opens the store, creating `dir` if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(JsonStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of<R: Record>(&self) -> PathBuf {
        self.dir.join(R::FILE_NAME)
    }
}

impl CollectionStore for JsonStore {
    /// A missing file is an empty collection.
    fn read<R: Record>(&self) -> Result<Vec<R>> {
        let path = self.path_of::<R>();
        let mut f = match OpenOptions::new().read(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records = serde_json::from_str(&s).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to decode collection");
            e
        })?;
        Ok(records)
    }

    /// Replaces the whole file. The records go to a sibling `.json.tmp` file
    /// that is renamed over the collection, so readers see the old or the new
    /// contents and never a partial write.
    fn write<R: Record>(&mut self, records: &[R]) -> Result<()> {
        let path = self.path_of::<R>();
        let tmp = path.with_extension("json.tmp");
        let s = serde_json::to_string_pretty(records)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;
        f.write_all(s.as_bytes())?;
        f.sync_all()?;
        drop(f);
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::trace!(path = %path.display(), count = records.len(), "collection written");
        Ok(())
    }
}
