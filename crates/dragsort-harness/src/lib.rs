#![forbid(unsafe_code)]

//! In-memory host for driving `dragsort` controllers in tests and benches.
//!
//! [`MockDom`] is a tiny element tree with:
//! - a deterministic monotonic clock advanced explicitly by the test;
//! - slot layouts that position a container's children in a row or column,
//!   recomputed from the live child order on every query;
//! - per-node inline style maps and class attributes;
//! - a listener table keyed by controller;
//! - a journal of every mutating host call, exportable as JSONL.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use dragsort::{ControllerId, ReorderHost};
use dragsort_core::event::{Subscription, Subscriptions};
use dragsort_core::geometry::{Point, Rect};
use dragsort_core::style::StyleValue;
use dragsort_core::timer::DeterministicClock;
use serde_json::json;
use std::time::Duration;

/// Handle to one node in a [`MockDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Direction a slot layout stacks children in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Uniform slots for a container's children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotLayout {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub axis: Axis,
}

impl SlotLayout {
    /// Rect of the slot at `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Rect {
        let i = index as f64;
        match self.axis {
            Axis::Vertical => Rect::from_origin_size(
                self.origin.x,
                self.origin.y + i * self.height,
                self.width,
                self.height,
            ),
            Axis::Horizontal => Rect::from_origin_size(
                self.origin.x + i * self.width,
                self.origin.y,
                self.width,
                self.height,
            ),
        }
    }

    /// Center point of the slot at `index`.
    #[must_use]
    pub fn center(&self, index: usize) -> Point {
        let rect = self.slot(index);
        Point::new(
            rect.left + rect.width() / 2.0,
            rect.top + rect.height() / 2.0,
        )
    }
}

/// One registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub controller: ControllerId,
    pub subscription: Subscription,
    pub target: Option<NodeId>,
}

/// A mutating host call, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    InsertBefore {
        parent: NodeId,
        node: NodeId,
        reference: Option<NodeId>,
    },
    CloneNode {
        source: NodeId,
        clone: NodeId,
    },
    AttachOverlay(NodeId),
    RemoveOverlay(NodeId),
    SetStyle {
        node: NodeId,
        property: String,
        value: String,
    },
    RemoveStyle {
        node: NodeId,
        property: String,
    },
    SetClass {
        node: NodeId,
        class: String,
    },
    FlushLayout(NodeId),
    Subscribe(Listener),
    Unsubscribe {
        controller: ControllerId,
        subscription: Subscription,
    },
}

impl HostOp {
    /// Stable JSON form used by [`MockDom::journal_jsonl`].
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::InsertBefore {
                parent,
                node,
                reference,
            } => json!({
                "op": "insert_before",
                "parent": parent.get(),
                "node": node.get(),
                "reference": reference.map(NodeId::get),
            }),
            Self::CloneNode { source, clone } => {
                json!({"op": "clone_node", "source": source.get(), "clone": clone.get()})
            }
            Self::AttachOverlay(node) => json!({"op": "attach_overlay", "node": node.get()}),
            Self::RemoveOverlay(node) => json!({"op": "remove_overlay", "node": node.get()}),
            Self::SetStyle {
                node,
                property,
                value,
            } => json!({
                "op": "set_style",
                "node": node.get(),
                "property": property,
                "value": value,
            }),
            Self::RemoveStyle { node, property } => {
                json!({"op": "remove_style", "node": node.get(), "property": property})
            }
            Self::SetClass { node, class } => {
                json!({"op": "set_class", "node": node.get(), "class": class})
            }
            Self::FlushLayout(node) => json!({"op": "flush_layout", "node": node.get()}),
            Self::Subscribe(listener) => json!({
                "op": "subscribe",
                "controller": listener.controller.get(),
                "subscription": format!("{:?}", listener.subscription),
                "target": listener.target.map(NodeId::get),
            }),
            Self::Unsubscribe {
                controller,
                subscription,
            } => json!({
                "op": "unsubscribe",
                "controller": controller.get(),
                "subscription": format!("{subscription:?}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct NodeData {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Option<Rect>,
    styles: BTreeMap<String, StyleValue>,
    class: Option<String>,
}

/// In-memory [`ReorderHost`].
#[derive(Debug, Default)]
pub struct MockDom {
    nodes: Vec<NodeData>,
    layouts: BTreeMap<NodeId, SlotLayout>,
    overlays: Vec<NodeId>,
    clock: DeterministicClock,
    listeners: Vec<Listener>,
    unsupported: BTreeSet<String>,
    journal: Vec<HostOp>,
}

impl MockDom {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A container with one child per label, laid out in `width` x `height`
    /// slots starting at the viewport origin.
    #[must_use]
    pub fn list(labels: &[&str], axis: Axis, width: f64, height: f64) -> (Self, NodeId, Vec<NodeId>) {
        let mut dom = Self::new();
        let group = dom.create_element("group");
        let items = labels
            .iter()
            .map(|label| {
                let item = dom.create_element(label);
                dom.append_child(group, item);
                item
            })
            .collect();
        dom.layout_slots(
            group,
            SlotLayout {
                origin: Point::new(0.0, 0.0),
                width,
                height,
                axis,
            },
        );
        (dom, group, items)
    }

    /// Vertical list of 200 x 50 rows.
    #[must_use]
    pub fn column(labels: &[&str]) -> (Self, NodeId, Vec<NodeId>) {
        Self::list(labels, Axis::Vertical, 200.0, 50.0)
    }

    /// Horizontal list of 80 x 40 tiles.
    #[must_use]
    pub fn row(labels: &[&str]) -> (Self, NodeId, Vec<NodeId>) {
        Self::list(labels, Axis::Horizontal, 80.0, 40.0)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, label: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            label: label.to_owned(),
            ..NodeData::default()
        });
        id
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Position `container`'s children in uniform slots.
    pub fn layout_slots(&mut self, container: NodeId, layout: SlotLayout) {
        self.layouts.insert(container, layout);
    }

    /// Slot layout of `container`, if any.
    #[must_use]
    pub fn slot_layout(&self, container: NodeId) -> Option<SlotLayout> {
        self.layouts.get(&container).copied()
    }

    /// Give `node` a fixed bounding rect.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.node_mut(node).rect = Some(rect);
    }

    /// Make the host reject `property` unprefixed.
    pub fn mark_unsupported(&mut self, property: &str) {
        self.unsupported.insert(property.to_owned());
    }

    #[must_use]
    pub fn label(&self, node: NodeId) -> &str {
        &self.node(node).label
    }

    /// Labels of `parent`'s children, in order.
    #[must_use]
    pub fn labels(&self, parent: NodeId) -> Vec<String> {
        self.node(parent)
            .children
            .iter()
            .map(|child| self.node(*child).label.clone())
            .collect()
    }

    /// Inline style `property` on `node`.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&StyleValue> {
        self.node(node).styles.get(property)
    }

    /// Every inline style on `node`.
    #[must_use]
    pub fn styles(&self, node: NodeId) -> &BTreeMap<String, StyleValue> {
        &self.node(node).styles
    }

    #[must_use]
    pub fn class(&self, node: NodeId) -> Option<&str> {
        self.node(node).class.as_deref()
    }

    /// Nodes currently attached as overlays.
    #[must_use]
    pub fn overlays(&self) -> &[NodeId] {
        &self.overlays
    }

    #[must_use]
    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    /// Listeners currently held by `controller`.
    #[must_use]
    pub fn subscriptions_for(&self, controller: ControllerId) -> Subscriptions {
        self.listeners
            .iter()
            .filter(|listener| listener.controller == controller)
            .fold(Subscriptions::empty(), |set, listener| {
                set | listener.subscription.flag()
            })
    }

    /// Target element of `controller`'s `subscription`, if registered on one.
    #[must_use]
    pub fn listener_target(
        &self,
        controller: ControllerId,
        subscription: Subscription,
    ) -> Option<NodeId> {
        self.listeners
            .iter()
            .find(|listener| listener.controller == controller && listener.subscription == subscription)
            .and_then(|listener| listener.target)
    }

    /// Controllers listening for `subscription`, in registration order.
    #[must_use]
    pub fn listeners_for(&self, subscription: Subscription) -> Vec<ControllerId> {
        self.listeners
            .iter()
            .filter(|listener| listener.subscription == subscription)
            .map(|listener| listener.controller)
            .collect()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    #[must_use]
    pub fn journal(&self) -> &[HostOp] {
        &self.journal
    }

    /// Drain the journal.
    pub fn take_journal(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.journal)
    }

    /// The journal, one JSON object per line.
    #[must_use]
    pub fn journal_jsonl(&self) -> String {
        let mut out = String::new();
        for op in &self.journal {
            out.push_str(&op.to_json().to_string());
            out.push('\n');
        }
        out
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0 as usize]
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|child| *child != node);
        }
    }

    fn deep_clone(&mut self, source: NodeId) -> NodeId {
        let data = self.node(source).clone();
        let clone = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            label: format!("{} (clone)", data.label),
            parent: None,
            children: Vec::new(),
            rect: data.rect,
            styles: data.styles,
            class: data.class,
        });
        for child in data.children {
            let copy = self.deep_clone(child);
            self.append_child(clone, copy);
        }
        clone
    }

    fn record(&mut self, op: HostOp) {
        tracing::trace!(?op, "host op");
        self.journal.push(op);
    }
}

impl ReorderHost for MockDom {
    type Node = NodeId;

    fn now_mono(&self) -> Duration {
        self.clock.now()
    }

    fn children(&self, parent: &NodeId) -> Vec<NodeId> {
        self.node(*parent).children.clone()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.node(*node).parent
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.node(*node).parent?;
        let siblings = &self.node(parent).children;
        let position = siblings.iter().position(|child| child == node)?;
        siblings.get(position + 1).copied()
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        let data = self.node(*node);
        if let Some(rect) = data.rect {
            return rect;
        }
        data.parent
            .and_then(|parent| {
                let layout = self.layouts.get(&parent)?;
                let index = self.node(parent).children.iter().position(|c| c == node)?;
                Some(layout.slot(index))
            })
            .unwrap_or_default()
    }

    fn insert_before(&mut self, parent: &NodeId, node: &NodeId, reference: Option<&NodeId>) {
        self.record(HostOp::InsertBefore {
            parent: *parent,
            node: *node,
            reference: reference.copied(),
        });
        self.detach(*node);
        let siblings = &mut self.node_mut(*parent).children;
        let position = reference
            .and_then(|reference| siblings.iter().position(|child| child == reference))
            .unwrap_or(siblings.len());
        siblings.insert(position, *node);
        self.node_mut(*node).parent = Some(*parent);
    }

    fn clone_node(&mut self, node: &NodeId) -> NodeId {
        let clone = self.deep_clone(*node);
        self.record(HostOp::CloneNode {
            source: *node,
            clone,
        });
        clone
    }

    fn attach_overlay(&mut self, overlay: &NodeId) {
        self.record(HostOp::AttachOverlay(*overlay));
        if !self.overlays.contains(overlay) {
            self.overlays.push(*overlay);
        }
    }

    fn remove_overlay(&mut self, overlay: &NodeId) {
        self.record(HostOp::RemoveOverlay(*overlay));
        self.overlays.retain(|node| node != overlay);
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &StyleValue) {
        self.record(HostOp::SetStyle {
            node: *node,
            property: property.to_owned(),
            value: value.to_string(),
        });
        self.node_mut(*node)
            .styles
            .insert(property.to_owned(), value.clone());
    }

    fn remove_style(&mut self, node: &NodeId, property: &str) {
        self.record(HostOp::RemoveStyle {
            node: *node,
            property: property.to_owned(),
        });
        self.node_mut(*node).styles.remove(property);
    }

    fn set_class(&mut self, node: &NodeId, class: &str) {
        self.record(HostOp::SetClass {
            node: *node,
            class: class.to_owned(),
        });
        self.node_mut(*node).class = Some(class.to_owned());
    }

    fn flush_layout(&mut self, node: &NodeId) {
        self.record(HostOp::FlushLayout(*node));
    }

    fn supports_style_property(&self, property: &str) -> bool {
        !self.unsupported.contains(property)
    }

    fn subscribe(
        &mut self,
        controller: ControllerId,
        subscription: Subscription,
        target: Option<&NodeId>,
    ) {
        let listener = Listener {
            controller,
            subscription,
            target: target.copied(),
        };
        self.record(HostOp::Subscribe(listener));
        self.listeners.push(listener);
    }

    fn unsubscribe(&mut self, controller: ControllerId, subscription: Subscription) {
        self.record(HostOp::Unsubscribe {
            controller,
            subscription,
        });
        self.listeners.retain(|listener| {
            !(listener.controller == controller && listener.subscription == subscription)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, HostOp, MockDom};
    use dragsort::ReorderHost;
    use dragsort_core::geometry::{Point, Rect};
    use dragsort_core::style::StyleValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn column_layout_follows_live_order() {
        let (mut dom, group, items) = MockDom::column(&["a", "b", "c"]);
        assert_eq!(
            dom.bounding_rect(&items[1]),
            Rect::from_origin_size(0.0, 50.0, 200.0, 50.0)
        );
        dom.insert_before(&group, &items[2], Some(&items[0]));
        assert_eq!(dom.labels(group), vec!["c", "a", "b"]);
        assert_eq!(
            dom.bounding_rect(&items[2]),
            Rect::from_origin_size(0.0, 0.0, 200.0, 50.0)
        );
    }

    #[test]
    fn explicit_rect_overrides_slot_layout() {
        let (mut dom, group, items) = MockDom::column(&["a", "b"]);
        let layout = dom.slot_layout(group).unwrap();
        assert_eq!(layout.axis, Axis::Vertical);
        assert_eq!(layout.center(1), Point::new(100.0, 75.0));
        assert_eq!(dom.slot_layout(items[0]), None);

        let pinned = Rect::from_origin_size(10.0, 400.0, 30.0, 30.0);
        dom.set_rect(items[1], pinned);
        assert_eq!(dom.bounding_rect(&items[1]), pinned);
        assert_eq!(dom.bounding_rect(&items[0]), layout.slot(0));
    }

    #[test]
    fn insert_before_none_appends() {
        let (mut dom, group, items) = MockDom::row(&["a", "b", "c"]);
        dom.insert_before(&group, &items[0], None);
        assert_eq!(dom.labels(group), vec!["b", "c", "a"]);
        assert_eq!(dom.next_sibling(&items[2]), Some(items[0]));
        assert_eq!(dom.next_sibling(&items[0]), None);
    }

    #[test]
    fn clone_is_deep_and_detached() {
        let (mut dom, _group, items) = MockDom::column(&["a"]);
        let icon = dom.create_element("icon");
        dom.append_child(items[0], icon);
        dom.set_style(&items[0], "color", &StyleValue::keyword("red"));
        let clone = dom.clone_node(&items[0]);
        assert_eq!(dom.parent(&clone), None);
        assert_eq!(dom.labels(clone), vec!["icon (clone)"]);
        assert_eq!(dom.style(clone, "color"), Some(&StyleValue::keyword("red")));
    }

    #[test]
    fn journal_exports_jsonl() {
        let (mut dom, _group, items) = MockDom::column(&["a"]);
        dom.set_style(&items[0], "left", &StyleValue::Px(0.0));
        dom.flush_layout(&items[0]);
        assert_eq!(dom.journal().len(), 2);
        assert!(matches!(dom.journal()[1], HostOp::FlushLayout(_)));
        let jsonl = dom.journal_jsonl();
        let first = jsonl.lines().next().unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(first).unwrap();
        assert_eq!(value["op"], "set_style");
        assert_eq!(value["value"], "0px");
    }
}
