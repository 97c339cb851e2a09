use std::time::SystemTime;

/// Path reserved for the synthetic child that marks an unexpanded directory.
pub const PLACEHOLDER_PATH: &str = "";

/// Stable identifier of a node inside a [`NodeStore`].
///
/// The generation changes every time a slot is reused, so an id that outlived
/// its node never resolves to the node that took its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// Lazy-loading state of a directory node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionState {
    /// Never inspected, no children.
    #[default]
    Unexpanded,
    /// Holds exactly one placeholder child.
    Placeholder,
    /// Holds the real children found by discovery.
    Expanded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Placeholder,
    File { size: u64 },
    Directory { state: ExpansionState },
}

#[derive(Debug, Clone)]
pub struct Node {
    path: String,
    kind: NodeKind,
    modified_time: Option<SystemTime>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn modified_time(&self) -> Option<SystemTime> {
        self.modified_time
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, NodeKind::Placeholder)
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Expansion state, `None` for anything that is not a directory.
    pub fn expansion_state(&self) -> Option<ExpansionState> {
        match self.kind {
            NodeKind::Directory { state } => Some(state),
            _ => None,
        }
    }

    pub fn set_expansion_state(&mut self, new_state: ExpansionState) {
        if let NodeKind::Directory { state } = &mut self.kind {
            *state = new_state;
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena that owns every node of a tree.
///
/// Parent/child links are ids into the arena, so a child never owns its
/// parent. Removing a child releases its whole subtree.
#[derive(Debug, Default)]
pub struct NodeStore {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_node(
        &mut self,
        path: impl Into<String>,
        kind: NodeKind,
        modified_time: Option<SystemTime>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let node = Node {
            path: path.into(),
            kind,
            modified_time,
            parent,
            children: Vec::new(),
        };

        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    pub fn create_placeholder(&mut self, parent: NodeId) -> NodeId {
        self.create_node(PLACEHOLDER_PATH, NodeKind::Placeholder, None, Some(parent))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) {
            return;
        }
        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = Some(parent);
        } else {
            return;
        }
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(child);
        }
    }

    /// Detaches the child at `index` and releases its subtree.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the children of `parent`.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) {
        let removed = match self.get_mut(parent) {
            Some(parent_node) => parent_node.children.remove(index),
            None => return,
        };
        self.release_subtree(removed);
    }

    pub fn clear_children(&mut self, parent: NodeId) {
        let removed = match self.get_mut(parent) {
            Some(parent_node) => std::mem::take(&mut parent_node.children),
            None => return,
        };
        for child in removed {
            self.release_subtree(child);
        }
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, |node| node.children.len())
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.get(id)
            .and_then(|node| node.children.get(index))
            .copied()
    }

    /// Index of the node within its parent's children, 0 for a root.
    pub fn row_of(&self, id: NodeId) -> usize {
        self.get(id)
            .and_then(|node| node.parent)
            .and_then(|parent| self.get(parent))
            .and_then(|parent_node| parent_node.children.iter().position(|child| *child == id))
            .unwrap_or(0)
    }

    fn release_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                pending.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
    }
}
