//! Lazily materialised directory tree.
//!
//! [`NodeStore`] owns the nodes, [`LazyTreeModel`] exposes them to a view
//! through positional [`NodeHandle`]s and fills directories on demand.

mod display;
mod handle;
mod model;
mod node;
mod observer;

pub use display::{COLUMN_COUNT, Column, Decoration, EntryType, LOADING_TEXT, format_size};
pub use handle::NodeHandle;
pub use model::{LazyTreeModel, ModelError};
pub use node::{ExpansionState, Node, NodeId, NodeKind, NodeStore, PLACEHOLDER_PATH};
pub use observer::ModelObserver;
