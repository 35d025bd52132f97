#![forbid(unsafe_code)]

//! The reorder controller: one per draggable container.
//!
//! # State Machine
//!
//! ```text
//!            pointer_down (valid)          pointer_move
//!   Idle ─────────────────────────▶ Armed ─────────────▶ Dragging ──┐
//!    ▲                                │                     │  ▲     │ pointer_move
//!    │        pointer_up / cancel     │                     │  └─────┘
//!    └────────────────────────────────┴─────────────────────┘
//! ```
//!
//! A pointer-down that is rejected leaves the controller `Idle`. Only a
//! session that reached `Dragging` reports through the completion callback.
//!
//! # Invariants
//!
//! 1. Document-level move/up listeners are held exactly while a session is
//!    active.
//! 2. The geometry snapshot is never refreshed by a relocation; rects stay
//!    a fixed grid of slots for the whole session.
//! 3. At most one pending refresh timer and at most one pending animation
//!    timer per node.
//! 4. After [`destroy`](ReorderController::destroy) the controller holds no
//!    listeners, no overlay, and no timers; every later input is ignored.
//!
//! # Failure Modes
//!
//! - A resolver that declines or fails, a node outside every child, or a
//!   snapshot without a slot for the node all abort just that gesture.
//! - Hosts that stop delivering pointer-up should call
//!   [`cancel`](ReorderController::cancel); nothing times out on its own.

use std::fmt;
use std::hash::Hash;

use dragsort_core::event::{PointerEvent, Subscription, Subscriptions, ViewportSignal};
use dragsort_core::geometry::Point;
use dragsort_core::style::{StyleProperty, StyleTable, StyleValue};
use dragsort_core::timer::{TimerId, TimerQueue};
use web_time::Duration;

use crate::animation::{Animator, TimerKind};
use crate::config::{DragElementResolver, DragEndCallback, ReorderConfig};
use crate::dispatch::{IgnoredReason, ReorderDispatch, ReorderLogEntry, ReorderOutcome, ReorderPhase};
use crate::error::ReorderError;
use crate::geometry_cache::GeometryCache;
use crate::host::{ControllerId, ReorderHost};
use crate::index::resolve_index;
use crate::reorder::{self, Relocation, SlotState};
use crate::session::{CloneOverlay, DiffRecord, DiffSide, DragSession, SessionState};

/// Drag-to-reorder controller for the children of one group element.
pub struct ReorderController<N: Clone + Eq + Hash> {
    id: ControllerId,
    group: N,
    scroll_element: N,
    resolver: Option<DragElementResolver<N>>,
    drag_end: Option<DragEndCallback<N>>,
    clone_style: Vec<(String, StyleValue)>,
    clone_class: Option<String>,
    refresh_debounce: Duration,
    styles: StyleTable,
    geometry: GeometryCache,
    timers: TimerQueue<TimerKind<N>>,
    refresh_timer: Option<TimerId>,
    animator: Animator<N>,
    subscriptions: Subscriptions,
    session: Option<DragSession<N>>,
    next_sequence: u64,
    destroyed: bool,
}

impl<N: Clone + Eq + Hash + fmt::Debug> fmt::Debug for ReorderController<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReorderController")
            .field("id", &self.id)
            .field("group", &self.group)
            .field("state", &self.state())
            .field("slots", &self.geometry.len())
            .field("pending_timers", &self.timers.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl<N: Clone + Eq + Hash + fmt::Debug> ReorderController<N> {
    /// Bind a controller to `config.group_element`.
    ///
    /// Registers the group pointer-down listener and the geometry refresh
    /// listeners, and schedules the initial (debounced) geometry capture.
    /// Without a group element nothing is registered and
    /// [`ReorderError::MissingGroupElement`] is returned.
    pub fn new<H>(config: ReorderConfig<N>, host: &mut H) -> Result<Self, ReorderError>
    where
        H: ReorderHost<Node = N>,
    {
        let ReorderConfig {
            group_element,
            scroll_element,
            drag_element,
            drag_end,
            options,
        } = config;

        let Some(group) = group_element else {
            tracing::error!("reorder controller not initialized: groupElement is required");
            return Err(ReorderError::MissingGroupElement);
        };

        let problems = options.validate();
        if !problems.is_empty() {
            tracing::error!(?problems, "reorder controller not initialized: invalid options");
            return Err(ReorderError::InvalidOptions(problems));
        }

        let styles = StyleTable::resolve(
            options.clone_element_style.keys().map(String::as_str),
            |name| host.supports_style_property(name),
        );

        let mut controller = Self {
            id: ControllerId::next(),
            scroll_element: scroll_element.unwrap_or_else(|| group.clone()),
            group,
            resolver: drag_element,
            drag_end,
            clone_style: options.clone_element_style.clone().into_iter().collect(),
            clone_class: options.clone_element_class.clone(),
            refresh_debounce: options.refresh_debounce(),
            styles,
            geometry: GeometryCache::new(),
            timers: TimerQueue::new(),
            refresh_timer: None,
            animator: Animator::new(options.delay()),
            subscriptions: Subscriptions::empty(),
            session: None,
            next_sequence: 1,
            destroyed: false,
        };

        for subscription in Subscriptions::PERSISTENT.subscriptions() {
            controller.listen(host, subscription);
        }
        controller.schedule_refresh(host);

        tracing::debug!(
            controller = %controller.id,
            group = ?controller.group,
            delay_ms = options.delay_ms,
            "reorder controller bound"
        );
        Ok(controller)
    }

    /// Controller identity used for host listener registration.
    #[must_use]
    pub const fn controller_id(&self) -> ControllerId {
        self.id
    }

    /// The group element.
    #[must_use]
    pub const fn group(&self) -> &N {
        &self.group
    }

    /// Current session phase.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, DragSession::state)
    }

    /// Cached slot geometry.
    #[must_use]
    pub const fn geometry(&self) -> &GeometryCache {
        &self.geometry
    }

    /// State of the dragged node, during a session.
    #[must_use]
    pub fn drag_state(&self) -> Option<&SlotState<N>> {
        self.session.as_ref().map(|session| &session.drag)
    }

    /// State of the node last dropped onto, during a session.
    #[must_use]
    pub fn drop_state(&self) -> Option<&SlotState<N>> {
        self.session.as_ref().and_then(|session| session.drop.as_ref())
    }

    /// Completion record accumulated so far, during a session.
    #[must_use]
    pub fn diff(&self) -> Option<&DiffRecord<N>> {
        self.session.as_ref().map(|session| &session.diff)
    }

    /// Drag overlay, during a session.
    #[must_use]
    pub fn overlay(&self) -> Option<&CloneOverlay<N>> {
        self.session.as_ref().map(|session| &session.overlay)
    }

    /// Listeners this controller currently holds.
    #[must_use]
    pub const fn subscriptions(&self) -> Subscriptions {
        self.subscriptions
    }

    /// Resolved style property names.
    #[must_use]
    pub const fn style_table(&self) -> &StyleTable {
        &self.styles
    }

    /// Pending animation end timer for `element`.
    #[must_use]
    pub fn pending_animation(&self, element: &N) -> Option<TimerId> {
        self.animator.pending_timer(element)
    }

    /// Number of nodes currently animating.
    #[must_use]
    pub fn active_animations(&self) -> usize {
        self.animator.active()
    }

    /// Whether a geometry refresh is scheduled.
    #[must_use]
    pub const fn refresh_pending(&self) -> bool {
        self.refresh_timer.is_some()
    }

    /// Earliest time [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Whether [`destroy`](Self::destroy) has run.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Handle a pointer-down delivered to the group element.
    pub fn pointer_down<H>(&mut self, host: &mut H, event: &PointerEvent<N>) -> ReorderDispatch<N>
    where
        H: ReorderHost<Node = N>,
    {
        let phase = ReorderPhase::PointerDown;
        let position = Some(event.position);

        let rejection = if self.destroyed {
            Some(IgnoredReason::Destroyed)
        } else if !event.button.is_primary() {
            Some(IgnoredReason::ButtonNotAllowed)
        } else if event.target == self.group {
            Some(IgnoredReason::TargetIsGroup)
        } else if self.session.is_some() {
            Some(IgnoredReason::SessionInProgress)
        } else {
            None
        };
        if let Some(reason) = rejection {
            return self.ignore(phase, reason, position);
        }

        if self.geometry.is_empty() {
            self.geometry.refresh(host, &self.group);
        }

        let element = match self.resolve_drag_element(event) {
            Ok(element) => element,
            Err(reason) => return self.ignore(phase, reason, position),
        };
        let Some(index) = resolve_index(host, &self.group, &element) else {
            return self.ignore(phase, IgnoredReason::IndexNotFound, position);
        };
        // A press on a nested node drags the child that contains it.
        let Some(item) = host.children(&self.group).into_iter().nth(index) else {
            return self.ignore(phase, IgnoredReason::IndexNotFound, position);
        };
        let Some(rect) = self.geometry.slot(index) else {
            return self.ignore(phase, IgnoredReason::SlotMissing, position);
        };

        let overlay = CloneOverlay::new(host.clone_node(&item), rect.origin());
        let diff = DiffRecord {
            old: DiffSide {
                node: Some(item.clone()),
                rect: Some(rect),
            },
            new: DiffSide::empty(),
        };
        tracing::debug!(controller = %self.id, ?element, ?item, index, "drag armed");
        self.session = Some(DragSession {
            drag: SlotState::at(item, index),
            drop: None,
            overlay,
            diff,
            last_pointer: event.position,
            moved: false,
        });
        self.listen(host, Subscription::DocumentPointerMove);
        self.listen(host, Subscription::DocumentPointerUp);

        self.forward(phase, position, ReorderOutcome::Armed { index }, false, None)
    }

    /// Handle a document-level pointer move.
    pub fn pointer_move<H>(&mut self, host: &mut H, position: Point) -> ReorderDispatch<N>
    where
        H: ReorderHost<Node = N>,
    {
        let phase = ReorderPhase::PointerMove;
        if self.destroyed {
            return self.ignore(phase, IgnoredReason::Destroyed, Some(position));
        }
        let Some(mut session) = self.session.take() else {
            return self.ignore(phase, IgnoredReason::NoActiveSession, Some(position));
        };

        if !session.moved {
            session.moved = true;
            self.attach_overlay(host, &mut session.overlay);
        }

        let (dx, dy) = position.delta_from(session.last_pointer);
        session.last_pointer = position;
        session.overlay.translate(dx, dy);
        host.set_style(
            &session.overlay.node,
            self.styles.property(StyleProperty::Transform),
            &StyleValue::translate3d(session.overlay.x, session.overlay.y),
        );

        let hit = self.geometry.hit_test(position);
        let mut relocation = None;
        if let Some(slot) = hit {
            relocation = self.relocate(host, &mut session, slot);
            if let Some(rect) = self.geometry.slot(slot) {
                session.diff.new.rect = Some(rect);
            }
        }
        self.session = Some(session);

        let outcome = match &relocation {
            Some(relocation) => ReorderOutcome::Relocated {
                from: relocation.from(),
                to: relocation.to(),
            },
            None => ReorderOutcome::Moved { hit },
        };
        tracing::trace!(controller = %self.id, x = position.x, y = position.y, ?hit, "pointer move");
        self.forward(phase, Some(position), outcome, true, relocation)
    }

    /// Handle a document-level pointer up; ends the session.
    pub fn pointer_up<H>(&mut self, host: &mut H, position: Point) -> ReorderDispatch<N>
    where
        H: ReorderHost<Node = N>,
    {
        let phase = ReorderPhase::PointerUp;
        if self.destroyed {
            return self.ignore(phase, IgnoredReason::Destroyed, Some(position));
        }
        let Some(session) = self.session.take() else {
            return self.ignore(phase, IgnoredReason::NoActiveSession, Some(position));
        };
        let callback_invoked = self.end_session(host, session, true);
        self.forward(
            phase,
            Some(position),
            ReorderOutcome::Completed { callback_invoked },
            false,
            None,
        )
    }

    /// Abort the active session without invoking the completion callback.
    ///
    /// Child order changes already applied stay applied.
    pub fn cancel<H>(&mut self, host: &mut H) -> ReorderDispatch<N>
    where
        H: ReorderHost<Node = N>,
    {
        let phase = ReorderPhase::Cancel;
        if self.destroyed {
            return self.ignore(phase, IgnoredReason::Destroyed, None);
        }
        let Some(session) = self.session.take() else {
            return self.ignore(phase, IgnoredReason::NoActiveSession, None);
        };
        self.end_session(host, session, false);
        self.forward(phase, None, ReorderOutcome::Cancelled, false, None)
    }

    /// Host signal that child geometry may have changed.
    ///
    /// Signals inside one debounce window collapse into a single refresh,
    /// fired by [`tick`](Self::tick) once the window after the last signal
    /// has elapsed. Returns `false` after destroy.
    pub fn notify_viewport_change<H>(&mut self, host: &mut H, signal: ViewportSignal) -> bool
    where
        H: ReorderHost<Node = N>,
    {
        if self.destroyed {
            return false;
        }
        tracing::trace!(controller = %self.id, ?signal, "geometry refresh requested");
        self.schedule_refresh(host);
        true
    }

    /// Refresh geometry immediately, dropping any pending debounced refresh.
    pub fn refresh_geometry<H>(&mut self, host: &mut H)
    where
        H: ReorderHost<Node = N>,
    {
        if self.destroyed {
            return;
        }
        if let Some(id) = self.refresh_timer.take() {
            self.timers.cancel(id);
        }
        self.geometry.refresh(host, &self.group);
    }

    /// Fire every timer due at the host's current time. Returns how many fired.
    pub fn tick<H>(&mut self, host: &mut H) -> usize
    where
        H: ReorderHost<Node = N>,
    {
        let now = host.now_mono();
        let mut fired = 0;
        while let Some((id, kind)) = self.timers.pop_due(now) {
            fired += 1;
            match kind {
                TimerKind::GeometryRefresh => {
                    if self.refresh_timer == Some(id) {
                        self.refresh_timer = None;
                        self.geometry.refresh(host, &self.group);
                        tracing::trace!(
                            controller = %self.id,
                            slots = self.geometry.len(),
                            "geometry refreshed"
                        );
                    }
                }
                TimerKind::AnimationEnd(element) => {
                    self.animator.finish(host, &self.styles, &element, id);
                }
            }
        }
        fired
    }

    /// Unbind every listener, tear down an active session without a
    /// callback, cancel all timers, and clear cached state.
    ///
    /// Nodes still mid-animation have their transition styles removed so
    /// they settle at their final position. Idempotent.
    pub fn destroy<H>(&mut self, host: &mut H)
    where
        H: ReorderHost<Node = N>,
    {
        if self.destroyed {
            return;
        }
        let had_session = if let Some(session) = self.session.take() {
            self.end_session(host, session, false);
            true
        } else {
            false
        };
        self.unlisten(host, Subscriptions::all());
        if let Some(id) = self.refresh_timer.take() {
            self.timers.cancel(id);
        }
        let interrupted = self
            .animator
            .cancel_all(host, &self.styles, &mut self.timers);
        self.timers.drain();
        self.geometry.clear();
        self.destroyed = true;
        tracing::debug!(
            controller = %self.id,
            had_session,
            interrupted,
            "reorder controller destroyed"
        );
    }

    fn resolve_drag_element(&mut self, event: &PointerEvent<N>) -> Result<N, IgnoredReason> {
        let Some(resolver) = self.resolver.as_mut() else {
            return Ok(event.target.clone());
        };
        match resolver(event) {
            Ok(Some(element)) => Ok(element),
            Ok(None) => Err(IgnoredReason::ResolverDeclined),
            Err(error) => {
                tracing::debug!(controller = %self.id, %error, "drag element resolver failed");
                Err(IgnoredReason::ResolverFailed)
            }
        }
    }

    fn relocate<H>(
        &mut self,
        host: &mut H,
        session: &mut DragSession<N>,
        slot: usize,
    ) -> Option<Relocation<N>>
    where
        H: ReorderHost<Node = N>,
    {
        let relocation = reorder::relocate(host, &self.group, &mut session.drag, slot)?;
        for slot_move in &relocation.moves {
            let (Some(target), Some(origin)) = (
                self.geometry.slot(slot_move.to_slot),
                self.geometry.slot(slot_move.from_slot),
            ) else {
                continue;
            };
            self.animator.animate(
                host,
                &self.styles,
                &mut self.timers,
                &slot_move.element,
                &target,
                &origin,
            );
        }
        session.drop = Some(relocation.drop.clone());
        session.diff.old.node = Some(session.drag.element.clone());
        session.diff.new.node = Some(relocation.drop.element.clone());
        tracing::debug!(
            controller = %self.id,
            from = relocation.from(),
            to = relocation.to(),
            drop_index = relocation.drop.index,
            "relocated"
        );
        Some(relocation)
    }

    fn attach_overlay<H>(&self, host: &mut H, overlay: &mut CloneOverlay<N>)
    where
        H: ReorderHost<Node = N>,
    {
        let node = &overlay.node;
        host.set_style(
            node,
            self.styles.property(StyleProperty::Transition),
            &StyleValue::none(),
        );
        host.set_style(
            node,
            self.styles.property(StyleProperty::Position),
            &StyleValue::keyword("fixed"),
        );
        host.set_style(node, self.styles.property(StyleProperty::Left), &StyleValue::Px(0.0));
        host.set_style(node, self.styles.property(StyleProperty::Top), &StyleValue::Px(0.0));
        for (property, value) in &self.clone_style {
            host.set_style(node, self.styles.name(property), value);
        }
        if let Some(class) = &self.clone_class {
            host.set_class(node, class);
        }
        host.attach_overlay(node);
        overlay.attached = true;
    }

    /// Release session listeners and the overlay. Returns whether the
    /// completion callback ran.
    fn end_session<H>(&mut self, host: &mut H, session: DragSession<N>, notify: bool) -> bool
    where
        H: ReorderHost<Node = N>,
    {
        self.unlisten(host, Subscriptions::SESSION);
        let mut invoked = false;
        if notify
            && session.moved
            && let Some(callback) = self.drag_end.as_mut()
        {
            callback(&session.diff.old, &session.diff.new);
            invoked = true;
        }
        if session.overlay.attached {
            host.remove_overlay(&session.overlay.node);
        }
        tracing::debug!(
            controller = %self.id,
            moved = session.moved,
            notify,
            callback_invoked = invoked,
            "drag session ended"
        );
        invoked
    }

    fn schedule_refresh<H>(&mut self, host: &H)
    where
        H: ReorderHost<Node = N>,
    {
        if let Some(id) = self.refresh_timer.take() {
            self.timers.cancel(id);
        }
        let deadline = host.now_mono().saturating_add(self.refresh_debounce);
        self.refresh_timer = Some(self.timers.schedule(deadline, TimerKind::GeometryRefresh));
    }

    fn listen<H>(&mut self, host: &mut H, subscription: Subscription)
    where
        H: ReorderHost<Node = N>,
    {
        if self.subscriptions.contains(subscription.flag()) {
            return;
        }
        let target = match subscription {
            Subscription::GroupPointerDown => Some(&self.group),
            Subscription::ScrollElementScroll => Some(&self.scroll_element),
            _ => None,
        };
        host.subscribe(self.id, subscription, target);
        self.subscriptions.insert(subscription.flag());
    }

    fn unlisten<H>(&mut self, host: &mut H, set: Subscriptions)
    where
        H: ReorderHost<Node = N>,
    {
        for subscription in (self.subscriptions & set).subscriptions() {
            host.unsubscribe(self.id, subscription);
        }
        self.subscriptions.remove(set);
    }

    fn ignore(
        &self,
        phase: ReorderPhase,
        reason: IgnoredReason,
        position: Option<Point>,
    ) -> ReorderDispatch<N> {
        tracing::debug!(controller = %self.id, ?phase, ?reason, "input ignored");
        ReorderDispatch::ignored(self.id, phase, reason, position)
    }

    fn forward(
        &mut self,
        phase: ReorderPhase,
        position: Option<Point>,
        outcome: ReorderOutcome,
        prevent_default: bool,
        relocation: Option<Relocation<N>>,
    ) -> ReorderDispatch<N> {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        ReorderDispatch {
            prevent_default,
            relocation,
            log: ReorderLogEntry {
                controller: self.id,
                phase,
                sequence: Some(sequence),
                position,
                outcome,
            },
        }
    }
}
