#![forbid(unsafe_code)]

//! Displacement animation for nodes that changed slot.
//!
//! A moved node is first snapped back (no transition) to where it used to
//! be, the host flushes layout so the snap is committed, then a timed
//! transition slides it to zero offset. When the transition window ends the
//! inline transition/transform are removed so the node returns to plain flow.
//!
//! # Invariants
//!
//! 1. At most one end timer is pending per node; re-animating a node cancels
//!    its previous timer first.
//! 2. An end timer only clears styles if it is still the node's current timer.

use std::hash::Hash;

use ahash::AHashMap;
use dragsort_core::geometry::Rect;
use dragsort_core::style::{StyleProperty, StyleTable, StyleValue};
use dragsort_core::timer::{TimerId, TimerQueue};
use web_time::Duration;

use crate::host::ReorderHost;

/// Deferred controller work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerKind<N> {
    /// Debounced geometry refresh.
    GeometryRefresh,
    /// End of a displacement animation on a node.
    AnimationEnd(N),
}

/// Pending animation end timers, keyed by node.
#[derive(Debug, Clone)]
pub struct Animator<N: Eq + Hash> {
    delay: Duration,
    pending: AHashMap<N, TimerId>,
}

impl<N: Clone + Eq + Hash> Animator<N> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: AHashMap::new(),
        }
    }

    /// Transition length.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Pending end timer for `element`.
    #[must_use]
    pub fn pending_timer(&self, element: &N) -> Option<TimerId> {
        self.pending.get(element).copied()
    }

    /// Number of nodes mid-animation.
    #[must_use]
    pub fn active(&self) -> usize {
        self.pending.len()
    }

    /// Slide `element` from `origin` to `target`.
    pub fn animate<H>(
        &mut self,
        host: &mut H,
        styles: &StyleTable,
        timers: &mut TimerQueue<TimerKind<N>>,
        element: &N,
        target: &Rect,
        origin: &Rect,
    ) where
        H: ReorderHost<Node = N>,
    {
        let transition = styles.property(StyleProperty::Transition);
        let transform = styles.property(StyleProperty::Transform);
        let (dx, dy) = target.offset_to(origin);

        host.set_style(element, transition, &StyleValue::none());
        host.set_style(element, transform, &StyleValue::translate3d(dx, dy));
        host.flush_layout(element);
        host.set_style(element, transition, &StyleValue::transition_all(self.delay));
        host.set_style(element, transform, &StyleValue::translate3d(0.0, 0.0));

        if let Some(previous) = self.pending.remove(element) {
            timers.cancel(previous);
        }
        let deadline = host.now_mono().saturating_add(self.delay);
        let id = timers.schedule(deadline, TimerKind::AnimationEnd(element.clone()));
        self.pending.insert(element.clone(), id);
    }

    /// Handle a fired end timer. Returns whether styles were cleared.
    pub fn finish<H>(&mut self, host: &mut H, styles: &StyleTable, element: &N, id: TimerId) -> bool
    where
        H: ReorderHost<Node = N>,
    {
        if self.pending.get(element) != Some(&id) {
            return false;
        }
        self.pending.remove(element);
        clear_styles(host, styles, element);
        true
    }

    /// Cancel every pending animation and clear its styles immediately.
    ///
    /// Returns how many nodes were still animating.
    pub fn cancel_all<H>(
        &mut self,
        host: &mut H,
        styles: &StyleTable,
        timers: &mut TimerQueue<TimerKind<N>>,
    ) -> usize
    where
        H: ReorderHost<Node = N>,
    {
        let pending: Vec<(N, TimerId)> = self.pending.drain().collect();
        for (element, id) in &pending {
            timers.cancel(*id);
            clear_styles(host, styles, element);
        }
        pending.len()
    }
}

fn clear_styles<H: ReorderHost>(host: &mut H, styles: &StyleTable, element: &H::Node) {
    host.remove_style(element, styles.property(StyleProperty::Transition));
    host.remove_style(element, styles.property(StyleProperty::Transform));
}
