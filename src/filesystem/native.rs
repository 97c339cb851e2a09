use std::fs;
use std::path::MAIN_SEPARATOR_STR;

use snafu::ResultExt;
use tracing::debug;

use crate::filesystem::provider::{
    EntryMetadata, FileSystemProvider, ListSnafu, ProviderError, StatSnafu,
};

/// Provider backed by the real filesystem through `std::fs`.
///
/// Metadata follows symbolic links, so a link to a directory is presented as
/// a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystemProvider for NativeFileSystem {
    fn list_directory(&self, path: &str) -> Result<Vec<String>, ProviderError> {
        let read_dir = fs::read_dir(path).context(ListSnafu { path })?;

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.context(ListSnafu { path })?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name == "." || name == ".." {
                continue;
            }
            names.push(name);
        }

        debug!("Listed {} entries in {}", names.len(), path);
        Ok(names)
    }

    fn stat_path(&self, path: &str) -> Result<EntryMetadata, ProviderError> {
        let metadata = fs::metadata(path).context(StatSnafu { path })?;
        let modified_time = metadata.modified().ok();

        if metadata.is_dir() {
            Ok(EntryMetadata::directory(modified_time))
        } else {
            Ok(EntryMetadata::file(metadata.len(), modified_time))
        }
    }

    fn path_separator(&self) -> &str {
        MAIN_SEPARATOR_STR
    }
}
