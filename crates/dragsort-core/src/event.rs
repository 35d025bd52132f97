#![forbid(unsafe_code)]

//! Canonical pointer and host-signal types.
//!
//! The host translates its native events into these values before handing
//! them to a controller. Only primary-button mouse input is modelled; touch
//! and pen normalization happen (or not) on the host side.
//!
//! # Design Notes
//!
//! - Coordinates are viewport pixels, the same space as
//!   [`Rect`](crate::geometry::Rect) snapshots.
//! - [`Subscription`] names one host listener a controller may hold; the host
//!   keys registrations by controller so instances never clobber each other.

use bitflags::bitflags;

use crate::geometry::Point;

/// Pointer button that produced a press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left button on a right-handed mouse.
    Primary,
    /// Wheel/middle button.
    Auxiliary,
    /// Right button.
    Secondary,
    /// Back, forward, or any other button index.
    Other(u8),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` index.
    #[must_use]
    pub const fn from_dom_index(index: u8) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::Primary)
    }
}

/// A pointer event delivered by the host.
///
/// `target` is the innermost node under the pointer, as the host's hit
/// testing reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent<N> {
    pub target: N,
    pub button: PointerButton,
    pub position: Point,
}

impl<N> PointerEvent<N> {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(target: N, button: PointerButton, position: Point) -> Self {
        Self {
            target,
            button,
            position,
        }
    }

    /// Primary-button event at `(x, y)`.
    #[must_use]
    pub const fn primary(target: N, x: f64, y: f64) -> Self {
        Self::new(target, PointerButton::Primary, Point::new(x, y))
    }
}

/// Host notification that cached child geometry may be out of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportSignal {
    /// The designated scroll container scrolled.
    ContainerScroll,
    /// The window scrolled.
    WindowScroll,
    /// The window was resized.
    WindowResize,
    /// Device orientation changed.
    OrientationChange,
    /// Children were added, removed, or restyled by someone else.
    Structure,
}

/// One host listener a controller can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subscription {
    /// Pointer-down on the group element.
    GroupPointerDown,
    /// Scroll on the scroll element.
    ScrollElementScroll,
    /// Window scroll.
    WindowScroll,
    /// Window resize.
    WindowResize,
    /// Orientation change.
    WindowOrientationChange,
    /// Document-level pointer move, held only during a drag session.
    DocumentPointerMove,
    /// Document-level pointer up, held only during a drag session.
    DocumentPointerUp,
}

impl Subscription {
    /// Every subscription, in registration order.
    pub const ALL: [Subscription; 7] = [
        Self::GroupPointerDown,
        Self::ScrollElementScroll,
        Self::WindowScroll,
        Self::WindowResize,
        Self::WindowOrientationChange,
        Self::DocumentPointerMove,
        Self::DocumentPointerUp,
    ];

    /// Bit for this subscription inside a [`Subscriptions`] set.
    #[must_use]
    pub const fn flag(self) -> Subscriptions {
        match self {
            Self::GroupPointerDown => Subscriptions::GROUP_POINTER_DOWN,
            Self::ScrollElementScroll => Subscriptions::SCROLL_ELEMENT_SCROLL,
            Self::WindowScroll => Subscriptions::WINDOW_SCROLL,
            Self::WindowResize => Subscriptions::WINDOW_RESIZE,
            Self::WindowOrientationChange => Subscriptions::WINDOW_ORIENTATION_CHANGE,
            Self::DocumentPointerMove => Subscriptions::DOCUMENT_POINTER_MOVE,
            Self::DocumentPointerUp => Subscriptions::DOCUMENT_POINTER_UP,
        }
    }
}

bitflags! {
    /// Set of listeners currently held by one controller.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Subscriptions: u8 {
        const GROUP_POINTER_DOWN = 0b0000_0001;
        const SCROLL_ELEMENT_SCROLL = 0b0000_0010;
        const WINDOW_SCROLL = 0b0000_0100;
        const WINDOW_RESIZE = 0b0000_1000;
        const WINDOW_ORIENTATION_CHANGE = 0b0001_0000;
        const DOCUMENT_POINTER_MOVE = 0b0010_0000;
        const DOCUMENT_POINTER_UP = 0b0100_0000;

        /// Listeners bound for the whole controller lifetime.
        const PERSISTENT = Self::GROUP_POINTER_DOWN.bits()
            | Self::SCROLL_ELEMENT_SCROLL.bits()
            | Self::WINDOW_SCROLL.bits()
            | Self::WINDOW_RESIZE.bits()
            | Self::WINDOW_ORIENTATION_CHANGE.bits();
        /// Listeners bound only while a drag session is active.
        const SESSION = Self::DOCUMENT_POINTER_MOVE.bits() | Self::DOCUMENT_POINTER_UP.bits();
    }
}

impl Subscriptions {
    /// Iterate the individual subscriptions in this set.
    pub fn subscriptions(self) -> impl Iterator<Item = Subscription> {
        Subscription::ALL
            .into_iter()
            .filter(move |sub| self.contains(sub.flag()))
    }
}
