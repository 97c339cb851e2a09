use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use crate::filesystem::provider::{EntryMetadata, FileSystemProvider, ProviderError};

#[derive(Debug, Clone)]
struct MemoryEntry {
    metadata: EntryMetadata,
    children: Vec<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, MemoryEntry>,
    denied_listings: HashSet<String>,
    broken_stats: HashSet<String>,
    list_calls: Vec<String>,
}

/// In-memory filesystem with `/` separators.
///
/// Clones share the same state, so a test can keep one copy to mutate the
/// filesystem while the model owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    state: Rc<RefCell<MemoryState>>,
}

pub fn timestamp(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

fn split_parent(path: &str) -> Option<(String, String)> {
    let (parent, name) = path.rsplit_once('/')?;
    if name.is_empty() {
        return None;
    }
    let parent = if parent.is_empty() { "/" } else { parent };
    Some((parent.to_string(), name.to_string()))
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.state.borrow_mut().entries.insert(
            "/".to_string(),
            MemoryEntry {
                metadata: EntryMetadata::directory(Some(timestamp(0))),
                children: Vec::new(),
            },
        );
        fs
    }

    pub fn add_dir(&self, path: &str) -> &Self {
        self.insert(path, EntryMetadata::directory(Some(timestamp(1_700_000_000))));
        self
    }

    pub fn add_file(&self, path: &str, size: u64) -> &Self {
        self.insert(path, EntryMetadata::file(size, Some(timestamp(1_700_000_000))));
        self
    }

    pub fn add_file_without_time(&self, path: &str, size: u64) -> &Self {
        self.insert(path, EntryMetadata::file(size, None));
        self
    }

    pub fn add_file_modified_at(&self, path: &str, size: u64, modified: SystemTime) -> &Self {
        self.insert(path, EntryMetadata::file(size, Some(modified)));
        self
    }

    pub fn remove(&self, path: &str) {
        let mut state = self.state.borrow_mut();
        state.entries.retain(|key, _| {
            key != path && !key.starts_with(&format!("{}/", path.trim_end_matches('/')))
        });
        if let Some((parent, name)) = split_parent(path) {
            if let Some(entry) = state.entries.get_mut(&parent) {
                entry.children.retain(|child| child != &name);
            }
        }
    }

    pub fn deny_listing(&self, path: &str) {
        self.state
            .borrow_mut()
            .denied_listings
            .insert(path.to_string());
    }

    pub fn allow_listing(&self, path: &str) {
        self.state.borrow_mut().denied_listings.remove(path);
    }

    pub fn break_stat(&self, path: &str) {
        self.state.borrow_mut().broken_stats.insert(path.to_string());
    }

    pub fn repair_stat(&self, path: &str) {
        self.state.borrow_mut().broken_stats.remove(path);
    }

    /// Paths passed to `list_directory`, in call order.
    pub fn list_calls(&self) -> Vec<String> {
        self.state.borrow().list_calls.clone()
    }

    fn insert(&self, path: &str, metadata: EntryMetadata) {
        let mut state = self.state.borrow_mut();
        if let Some((parent, name)) = split_parent(path) {
            state.ensure_directory(&parent);
            state.link(&parent, name);
        }
        state
            .entries
            .entry(path.to_string())
            .and_modify(|entry| entry.metadata = metadata.clone())
            .or_insert(MemoryEntry {
                metadata,
                children: Vec::new(),
            });
    }
}

impl MemoryState {
    fn ensure_directory(&mut self, path: &str) {
        if self.entries.contains_key(path) {
            return;
        }
        if let Some((parent, name)) = split_parent(path) {
            self.ensure_directory(&parent);
            self.link(&parent, name);
        }
        self.entries.insert(
            path.to_string(),
            MemoryEntry {
                metadata: EntryMetadata::directory(None),
                children: Vec::new(),
            },
        );
    }

    fn link(&mut self, parent: &str, name: String) {
        if let Some(entry) = self.entries.get_mut(parent) {
            if !entry.children.contains(&name) {
                entry.children.push(name);
            }
        }
    }
}

impl FileSystemProvider for MemoryFileSystem {
    fn list_directory(&self, path: &str) -> Result<Vec<String>, ProviderError> {
        let mut state = self.state.borrow_mut();
        state.list_calls.push(path.to_string());

        if state.denied_listings.contains(path) {
            return Err(ProviderError::ListError {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            });
        }

        match state.entries.get(path) {
            Some(entry) if entry.metadata.is_dir => Ok(entry.children.clone()),
            Some(_) => Err(ProviderError::ListError {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "not a directory"),
            }),
            None => Err(ProviderError::ListError {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
            }),
        }
    }

    fn stat_path(&self, path: &str) -> Result<EntryMetadata, ProviderError> {
        let state = self.state.borrow();
        if state.broken_stats.contains(path) {
            return Err(ProviderError::StatError {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "broken link"),
            });
        }

        state
            .entries
            .get(path)
            .map(|entry| entry.metadata.clone())
            .ok_or_else(|| ProviderError::StatError {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such entry"),
            })
    }

    fn path_separator(&self) -> &str {
        "/"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_keeps_insertion_order() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/home/z.txt", 1)
            .add_dir("/home/b")
            .add_file("/home/a.txt", 2);

        let names = fs.list_directory("/home").expect("Failed to list /home");
        assert_eq!(names, vec!["z.txt", "b", "a.txt"]);
        assert_eq!(fs.list_directory("/").expect("Failed to list /"), vec!["home"]);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/a").add_file("/a/x", 1).add_file("/b", 1);

        fs.remove("/a");

        assert_eq!(fs.list_directory("/").expect("Failed to list /"), vec!["b"]);
        assert!(fs.stat_path("/a/x").is_err());
    }

    #[test]
    fn test_failure_injection() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/locked").add_file("/link", 0);
        fs.deny_listing("/locked");
        fs.break_stat("/link");

        assert!(matches!(
            fs.list_directory("/locked"),
            Err(ProviderError::ListError { .. })
        ));
        assert!(matches!(
            fs.stat_path("/link"),
            Err(ProviderError::StatError { .. })
        ));

        fs.allow_listing("/locked");
        fs.repair_stat("/link");
        assert!(fs.list_directory("/locked").is_ok());
        assert!(fs.stat_path("/link").is_ok());
        assert_eq!(fs.list_calls(), vec!["/locked", "/locked"]);
    }
}
