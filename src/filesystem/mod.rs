//! Filesystem access for the tree model.
//!
//! The model only sees the [`FileSystemProvider`] trait; the native
//! implementation talks to the operating system.

mod native;
mod provider;

#[cfg(test)]
pub(crate) mod memory;

pub use native::NativeFileSystem;
pub use provider::{EntryMetadata, FileSystemProvider, ProviderError};
