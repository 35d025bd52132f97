#![forbid(unsafe_code)]

//! The boundary between a controller and the UI tree it reorders.
//!
//! A [`ReorderHost`] owns the nodes, their layout, their style maps, the
//! event listeners, and the clock. The controller only borrows node handles
//! and asks the host to act on them.

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dragsort_core::event::Subscription;
use dragsort_core::geometry::Rect;
use dragsort_core::style::StyleValue;
use web_time::Duration;

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one controller instance, used to key host listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u64);

impl ControllerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reorder#{}", self.0)
    }
}

/// Host environment a controller runs against.
///
/// Node handles are cheap to clone and compare by identity. All methods are
/// synchronous; none may call back into the controller.
pub trait ReorderHost {
    /// Opaque handle to one UI node.
    type Node: Clone + Eq + Hash + fmt::Debug;

    /// Current monotonic time.
    fn now_mono(&self) -> Duration;

    /// Element children of `parent`, in order.
    fn children(&self, parent: &Self::Node) -> Vec<Self::Node>;

    /// Parent of `node`, if attached.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Next element sibling of `node`.
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Current bounding box of `node` in viewport pixels.
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Move `node` under `parent`, before `reference` (or last when `None`).
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        node: &Self::Node,
        reference: Option<&Self::Node>,
    );

    /// Deep-clone `node` into a new detached node.
    fn clone_node(&mut self, node: &Self::Node) -> Self::Node;

    /// Attach a detached node at document level, above the page content.
    fn attach_overlay(&mut self, overlay: &Self::Node);

    /// Detach a node previously passed to [`attach_overlay`](Self::attach_overlay).
    fn remove_overlay(&mut self, overlay: &Self::Node);

    /// Write one inline style property.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &StyleValue);

    /// Clear one inline style property.
    fn remove_style(&mut self, node: &Self::Node, property: &str);

    /// Set the class attribute of `node`.
    fn set_class(&mut self, node: &Self::Node, class: &str);

    /// Force a synchronous layout flush so pending style writes take effect
    /// before the next write.
    fn flush_layout(&mut self, node: &Self::Node);

    /// Whether the host style map accepts `property` unprefixed.
    fn supports_style_property(&self, property: &str) -> bool;

    /// Register a listener for `controller`.
    ///
    /// `target` is the element the listener attaches to, or `None` for
    /// document/window level listeners.
    fn subscribe(
        &mut self,
        controller: ControllerId,
        subscription: Subscription,
        target: Option<&Self::Node>,
    );

    /// Remove a listener previously registered for `controller`.
    fn unsubscribe(&mut self, controller: ControllerId, subscription: Subscription);
}
