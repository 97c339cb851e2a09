use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, info};

use crate::ext::SystemTimeExt;
use crate::filesystem::{EntryMetadata, FileSystemProvider, ProviderError};
use crate::tree::display::{
    COLUMN_COUNT, Column, Decoration, EntryType, LOADING_TEXT, format_size, header_text,
};
use crate::tree::handle::NodeHandle;
use crate::tree::node::{ExpansionState, NodeId, NodeKind, NodeStore};
use crate::tree::observer::ModelObserver;

/// An entry found while scanning a directory, not yet attached to the tree.
#[derive(Debug, Clone)]
struct DiscoveredEntry {
    path: String,
    metadata: EntryMetadata,
}

/// Tree of filesystem entries that loads each directory only when asked to.
///
/// The first level under the root is read eagerly. Every directory found
/// below that gets a single placeholder child so a view can show it as
/// expandable without scanning it. [`LazyTreeModel::expand`] replaces the
/// placeholder with the real entries.
pub struct LazyTreeModel<P: FileSystemProvider> {
    provider: P,
    store: NodeStore,
    root: Option<NodeId>,
    root_path: String,
    epoch: u64,
    hide_hidden: bool,
    observers: Vec<Box<dyn ModelObserver>>,
}

impl<P: FileSystemProvider> LazyTreeModel<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            store: NodeStore::new(),
            root: None,
            root_path: String::new(),
            epoch: 0,
            hide_hidden: false,
            observers: Vec::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn hide_hidden(&self) -> bool {
        self.hide_hidden
    }

    /// Enables filtering of hidden entries for subsequent directory scans.
    ///
    /// Already expanded directories keep their entries until refreshed.
    pub fn set_hide_hidden(&mut self, enable: bool) {
        self.hide_hidden = enable;
    }

    pub fn add_observer(&mut self, observer: Box<dyn ModelObserver>) {
        self.observers.push(observer);
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Handle of the current root, invalid before the first reset.
    pub fn root(&self) -> NodeHandle {
        self.root
            .map(|root| NodeHandle::new(0, 0, root, self.epoch))
            .unwrap_or_default()
    }

    pub fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    pub fn header_data(&self, section: usize) -> Option<String> {
        header_text(section)
    }

    /// Replaces the whole tree with a new one rooted at `path`.
    ///
    /// The root's own entries are discovered immediately. If that fails the
    /// root stays expandable and [`LazyTreeModel::root`] can be used to retry.
    pub fn initialize_root(&mut self, path: impl Into<String>) -> Result<NodeHandle, ModelError> {
        let path = path.into();
        info!("Resetting tree to root {}", path);

        self.notify(|observer| observer.begin_reset());

        self.store = NodeStore::new();
        self.epoch += 1;
        self.root_path = path.clone();

        let root = self.store.create_node(
            path,
            NodeKind::Directory {
                state: ExpansionState::Unexpanded,
            },
            None,
            None,
        );
        self.root = Some(root);
        self.insert_placeholder(root);

        let root_handle = self.root();
        let result = self.expand(&root_handle);

        self.notify(|observer| observer.end_reset());

        result.map(|()| root_handle)
    }

    pub fn index(
        &self,
        row: usize,
        column: usize,
        parent: &NodeHandle,
    ) -> Result<NodeHandle, ModelError> {
        if column >= COLUMN_COUNT || row >= self.row_count(parent)? {
            return Ok(NodeHandle::invalid());
        }

        let Some(parent_id) = self.resolve_or_root(parent)? else {
            return Ok(NodeHandle::invalid());
        };

        Ok(self
            .store
            .child_at(parent_id, row)
            .map(|child| NodeHandle::new(row, column, child, self.epoch))
            .unwrap_or_default())
    }

    /// Handle of the parent row, invalid for top-level rows and the root.
    pub fn parent(&self, handle: &NodeHandle) -> Result<NodeHandle, ModelError> {
        let Some(id) = self.resolve(handle)? else {
            return Ok(NodeHandle::invalid());
        };

        match self.store.get(id).and_then(|node| node.parent()) {
            Some(parent_id) if Some(parent_id) != self.root => Ok(self.handle_for(parent_id, 0)),
            _ => Ok(NodeHandle::invalid()),
        }
    }

    /// Number of children under `parent`; an invalid handle addresses the root.
    pub fn row_count(&self, parent: &NodeHandle) -> Result<usize, ModelError> {
        if parent.column() > 0 {
            return Ok(0);
        }

        Ok(self
            .resolve_or_root(parent)?
            .map_or(0, |id| self.store.child_count(id)))
    }

    pub fn display_value(&self, handle: &NodeHandle) -> Result<Option<String>, ModelError> {
        let Some(id) = self.resolve(handle)? else {
            return Ok(None);
        };
        let node = self.store.get(id).context(StaleHandleSnafu)?;
        if node.is_placeholder() {
            return Ok(None);
        }

        let value = match Column::from_index(handle.column()) {
            Some(Column::Name) => self.entry_name(node.path()).to_string(),
            Some(Column::Type) => {
                let entry_type = if node.is_dir() {
                    EntryType::Directory
                } else {
                    EntryType::File
                };
                entry_type.to_string()
            }
            Some(Column::Size) => match node.kind() {
                NodeKind::Directory {
                    state: ExpansionState::Placeholder,
                } => LOADING_TEXT.to_string(),
                NodeKind::Directory { .. } => node.children().len().to_string(),
                NodeKind::File { size } => format_size(*size),
                NodeKind::Placeholder => return Ok(None),
            },
            Some(Column::LastModified) => node
                .modified_time()
                .map(|time| time.to_display_string())
                .unwrap_or_default(),
            None => return Ok(None),
        };

        Ok(Some(value))
    }

    /// Icon for the name column; other columns and placeholders have none.
    pub fn decoration(&self, handle: &NodeHandle) -> Result<Option<Decoration>, ModelError> {
        let Some(id) = self.resolve(handle)? else {
            return Ok(None);
        };
        if handle.column() != 0 {
            return Ok(None);
        }

        let node = self.store.get(id).context(StaleHandleSnafu)?;
        Ok(match node.kind() {
            NodeKind::Placeholder => None,
            NodeKind::Directory { .. } => Some(Decoration::Folder),
            NodeKind::File { .. } => Some(Decoration::File),
        })
    }

    /// True only for a directory that still holds its placeholder.
    pub fn can_expand(&self, handle: &NodeHandle) -> Result<bool, ModelError> {
        let Some(id) = self.resolve(handle)? else {
            return Ok(false);
        };
        Ok(self.is_awaiting_discovery(id))
    }

    /// Replaces the placeholder under `handle` with the directory's entries.
    ///
    /// Does nothing unless [`LazyTreeModel::can_expand`] holds. When listing
    /// or stat-ing fails the placeholder is kept, so the call can be retried.
    pub fn expand(&mut self, handle: &NodeHandle) -> Result<(), ModelError> {
        let Some(id) = self.resolve(handle)? else {
            return Ok(());
        };
        if !self.is_awaiting_discovery(id) {
            return Ok(());
        }

        let path = self.store.get(id).context(StaleHandleSnafu)?.path().to_string();
        debug!("Expanding {}", path);

        let entries = self.discover(&path).context(DiscoverySnafu { path: path.clone() })?;

        self.store.remove_child_at(id, 0);
        let count = self.attach(id, entries);
        debug!("Expanded {} with {} entries", path, count);

        let anchor = self.handle_for(id, 0);
        self.notify(|observer| observer.rows_inserted(&anchor, count));

        Ok(())
    }

    pub fn path_of(&self, handle: &NodeHandle) -> Result<&str, ModelError> {
        let Some(id) = self.resolve(handle)? else {
            return Ok("");
        };
        Ok(self.store.get(id).context(StaleHandleSnafu)?.path())
    }

    /// Drops the cached entries of a directory and scans it again.
    ///
    /// Only expanded directories are rescanned. A directory still holding its
    /// placeholder, a file and a placeholder are left untouched. Handles into
    /// the old subtree become stale. If the scan fails the directory is left
    /// holding its placeholder.
    pub fn refresh(&mut self, handle: &NodeHandle) -> Result<(), ModelError> {
        let Some(id) = self.resolve(handle)? else {
            return Ok(());
        };

        let node = self.store.get(id).context(StaleHandleSnafu)?;
        if node.expansion_state() != Some(ExpansionState::Expanded) {
            return Ok(());
        }
        debug!("Refreshing {}", node.path());

        let anchor = self.handle_for(id, 0);
        self.notify(|observer| observer.begin_refresh(&anchor));

        self.store.clear_children(id);
        self.insert_placeholder(id);
        let result = self.expand(&anchor);
        debug!("{} nodes cached after refresh", self.store.len());

        self.notify(|observer| observer.end_refresh(&anchor));

        result
    }

    fn resolve(&self, handle: &NodeHandle) -> Result<Option<NodeId>, ModelError> {
        let Some(target) = handle.target() else {
            return Ok(None);
        };
        if target.epoch != self.epoch || !self.store.contains(target.node) {
            return StaleHandleSnafu.fail();
        }
        Ok(Some(target.node))
    }

    fn resolve_or_root(&self, handle: &NodeHandle) -> Result<Option<NodeId>, ModelError> {
        Ok(self.resolve(handle)?.or(self.root))
    }

    fn handle_for(&self, id: NodeId, column: usize) -> NodeHandle {
        NodeHandle::new(self.store.row_of(id), column, id, self.epoch)
    }

    fn is_awaiting_discovery(&self, id: NodeId) -> bool {
        self.store
            .get(id)
            .and_then(|node| node.expansion_state())
            .is_some_and(|state| state == ExpansionState::Placeholder)
    }

    fn insert_placeholder(&mut self, id: NodeId) {
        let placeholder = self.store.create_placeholder(id);
        self.store.append_child(id, placeholder);
        if let Some(node) = self.store.get_mut(id) {
            node.set_expansion_state(ExpansionState::Placeholder);
        }
    }

    fn entry_name<'a>(&self, path: &'a str) -> &'a str {
        path.rsplit(self.provider.path_separator())
            .next()
            .unwrap_or(path)
    }

    fn child_path(&self, parent: &str, name: &str) -> String {
        let separator = self.provider.path_separator();
        if parent.ends_with(separator) {
            format!("{}{}", parent, name)
        } else {
            format!("{}{}{}", parent, separator, name)
        }
    }

    /// Lists and stats the entries of `path`, directories first.
    ///
    /// Nothing is attached to the tree here, so a failure part way through
    /// leaves no trace.
    fn discover(&self, path: &str) -> Result<Vec<DiscoveredEntry>, ProviderError> {
        let names = self.provider.list_directory(path)?;

        let mut directories = Vec::new();
        let mut files = Vec::new();
        for name in names {
            if name == "." || name == ".." {
                continue;
            }
            if self.hide_hidden && self.provider.is_hidden(&name) {
                debug!("Skipping hidden entry {}", name);
                continue;
            }

            let child_path = self.child_path(path, &name);
            let metadata = self.provider.stat_path(&child_path)?;
            let entry = DiscoveredEntry {
                path: child_path,
                metadata,
            };
            if entry.metadata.is_dir {
                directories.push(entry);
            } else {
                files.push(entry);
            }
        }

        directories.extend(files);
        Ok(directories)
    }

    fn attach(&mut self, id: NodeId, entries: Vec<DiscoveredEntry>) -> usize {
        let count = entries.len();

        for entry in entries {
            let is_dir = entry.metadata.is_dir;
            let kind = if is_dir {
                NodeKind::Directory {
                    state: ExpansionState::Unexpanded,
                }
            } else {
                NodeKind::File {
                    size: entry.metadata.size,
                }
            };

            let child = self
                .store
                .create_node(entry.path, kind, entry.metadata.modified_time, Some(id));
            self.store.append_child(id, child);
            if is_dir {
                self.insert_placeholder(child);
            }
        }

        if let Some(node) = self.store.get_mut(id) {
            node.set_expansion_state(ExpansionState::Expanded);
        }
        count
    }

    fn notify(&mut self, mut event: impl FnMut(&mut dyn ModelObserver)) {
        for observer in self.observers.iter_mut() {
            event(observer.as_mut());
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ModelError {
    #[snafu(display("The handle refers to a node that is no longer part of the tree"))]
    StaleHandleError,
    #[snafu(display("Failed to discover the entries of {}", path))]
    DiscoveryError { path: String, source: ProviderError },
}
