use std::time::SystemTime;

use snafu::Snafu;

/// Metadata captured for a single entry at discovery time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    pub is_dir: bool,
    /// Byte count, only meaningful for files.
    pub size: u64,
    pub modified_time: Option<SystemTime>,
}

impl EntryMetadata {
    pub fn directory(modified_time: Option<SystemTime>) -> Self {
        Self {
            is_dir: true,
            size: 0,
            modified_time,
        }
    }

    pub fn file(size: u64, modified_time: Option<SystemTime>) -> Self {
        Self {
            is_dir: false,
            size,
            modified_time,
        }
    }
}

/// The operating system primitives the tree model is built on.
///
/// The model never touches the filesystem directly; everything goes through
/// an implementation of this trait so the engine can be driven by a fake
/// filesystem in tests.
pub trait FileSystemProvider {
    /// Lists the entry names of the directory at `path`, excluding `.` and `..`.
    ///
    /// The order is whatever the provider yields; the model keeps it as-is
    /// within the directory and file groups.
    fn list_directory(&self, path: &str) -> Result<Vec<String>, ProviderError>;

    fn stat_path(&self, path: &str) -> Result<EntryMetadata, ProviderError>;

    fn path_separator(&self) -> &str;

    /// Whether an entry name is considered hidden.
    fn is_hidden(&self, name: &str) -> bool {
        name.starts_with('.')
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProviderError {
    #[snafu(display("Failed to list the entries of {}", path))]
    ListError {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read the metadata of {}", path))]
    StatError {
        path: String,
        source: std::io::Error,
    },
}
