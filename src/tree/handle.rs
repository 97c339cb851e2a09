use crate::tree::node::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct HandleTarget {
    pub(crate) node: NodeId,
    pub(crate) epoch: u64,
}

/// Positional reference to a cell of the model: a node plus a column.
///
/// A handle is only meaningful for the tree it was issued from. Resetting the
/// root bumps the model epoch, after which every older handle is rejected.
/// The default handle is invalid and stands for "the root" when passed as a
/// parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeHandle {
    row: usize,
    column: usize,
    target: Option<HandleTarget>,
}

impl NodeHandle {
    pub const fn invalid() -> Self {
        Self {
            row: 0,
            column: 0,
            target: None,
        }
    }

    pub(crate) fn new(row: usize, column: usize, node: NodeId, epoch: u64) -> Self {
        Self {
            row,
            column,
            target: Some(HandleTarget { node, epoch }),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.target.is_some()
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Same node, different column.
    pub fn with_column(&self, column: usize) -> Self {
        Self { column, ..*self }
    }

    pub(crate) fn target(&self) -> Option<HandleTarget> {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::{NodeKind, NodeStore};

    #[test]
    fn test_invalid_handle() {
        let handle = NodeHandle::invalid();
        assert!(!handle.is_valid());
        assert_eq!(handle, NodeHandle::default());
        assert_eq!(handle.target(), None);
    }

    #[test]
    fn test_handle_equality_depends_on_column_and_epoch() {
        let mut store = NodeStore::new();
        let id = store.create_node("/a", NodeKind::File { size: 0 }, None, None);

        let handle = NodeHandle::new(2, 0, id, 1);
        assert!(handle.is_valid());
        assert_eq!(handle, NodeHandle::new(2, 0, id, 1));
        assert_ne!(handle, NodeHandle::new(2, 0, id, 2));
        assert_ne!(handle, handle.with_column(3));

        let moved = handle.with_column(3);
        assert_eq!(moved.row(), 2);
        assert_eq!(moved.column(), 3);
        assert_eq!(moved.target(), handle.target());
    }
}
