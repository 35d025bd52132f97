#![forbid(unsafe_code)]

//! Locating a node within the group's child order.

use crate::host::ReorderHost;

/// Position of `node` among `group`'s children.
///
/// A direct child resolves to its own index. Otherwise the first child that
/// is an ancestor of `node` wins, so a handle nested inside an item resolves
/// to that item. `None` when `node` is not inside any child.
pub fn resolve_index<H: ReorderHost>(host: &H, group: &H::Node, node: &H::Node) -> Option<usize> {
    let children = host.children(group);
    if let Some(index) = children.iter().position(|child| child == node) {
        return Some(index);
    }
    children
        .iter()
        .position(|child| is_ancestor(host, child, node))
}

/// Whether `ancestor` is a proper ancestor of `node`.
pub fn is_ancestor<H: ReorderHost>(host: &H, ancestor: &H::Node, node: &H::Node) -> bool {
    let mut current = host.parent(node);
    while let Some(parent) = current {
        if &parent == ancestor {
            return true;
        }
        current = host.parent(&parent);
    }
    false
}
