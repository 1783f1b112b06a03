use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{NotifierError, Result};

/// Durable set of project links that were already announced.
///
/// Persisted as plain text, one link per line, append-only. Writes never
/// deduplicate; the controller checks `load()` before sending. All I/O is
/// synchronous so an append completes in full between suspension points.
pub struct SeenLinkStore {
    path: PathBuf,
}

impl SeenLinkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full set of seen links. A missing file is an empty set and
    /// is not created. Lines are trimmed; blank lines are ignored.
    pub fn load(&self) -> Result<HashSet<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => {
                return Err(NotifierError::StorageError(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                ))
                .into())
            }
        };

        let links: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        debug!("Loaded {} seen links from {}", links.len(), self.path.display());
        Ok(links)
    }

    /// Append one link and flush before returning.
    pub fn append(&self, link: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                NotifierError::StorageError(format!(
                    "Failed to open {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", link).map_err(|e| {
            NotifierError::StorageError(format!(
                "Failed to append to {}: {}",
                self.path.display(),
                e
            ))
        })?;
        file.flush()?;

        debug!("Recorded seen link: {}", link);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_set() {
        let dir = tempdir().unwrap();
        let store = SeenLinkStore::new(dir.path().join("sent_projects.txt"));

        let links = store.load().unwrap();
        assert!(links.is_empty());
        // load must not create the file
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_then_load_contains_link() {
        let dir = tempdir().unwrap();
        let store = SeenLinkStore::new(dir.path().join("sent_projects.txt"));

        store.append("https://mostaql.com/project/1").unwrap();
        let links = store.load().unwrap();
        assert!(links.contains("https://mostaql.com/project/1"));
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = SeenLinkStore::new(dir.path().join("sent_projects.txt"));

        store.append("https://mostaql.com/project/1").unwrap();
        store.append("https://mostaql.com/project/2").unwrap();
        assert_eq!(store.load().unwrap(), store.load().unwrap());
    }

    #[test]
    fn test_duplicate_lines_behave_as_one_membership() {
        let dir = tempdir().unwrap();
        let store = SeenLinkStore::new(dir.path().join("sent_projects.txt"));

        store.append("https://mostaql.com/project/1").unwrap();
        store.append("https://mostaql.com/project/1").unwrap();

        let links = store.load().unwrap();
        assert_eq!(links.len(), 1);
        assert!(links.contains("https://mostaql.com/project/1"));
    }

    #[test]
    fn test_load_trims_and_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sent_projects.txt");
        fs::write(&path, "  https://mostaql.com/project/1  \n\n\nhttps://mostaql.com/project/2\n\n").unwrap();

        let store = SeenLinkStore::new(path);
        let links = store.load().unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.contains("https://mostaql.com/project/1"));
        assert!(links.contains("https://mostaql.com/project/2"));
    }
}
