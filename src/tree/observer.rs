use crate::tree::handle::NodeHandle;

/// Change notifications for a view attached to the model.
///
/// Every `begin_*` is followed by the matching `end_*`, including when the
/// operation in between fails.
pub trait ModelObserver {
    /// The whole tree is about to be replaced; all handles become stale.
    fn begin_reset(&mut self) {}

    fn end_reset(&mut self) {}

    /// The subtree under `handle` is about to be rebuilt.
    fn begin_refresh(&mut self, _handle: &NodeHandle) {}

    fn end_refresh(&mut self, _handle: &NodeHandle) {}

    /// `count` real rows replaced the placeholder under `parent`.
    fn rows_inserted(&mut self, _parent: &NodeHandle, _count: usize) {}
}
