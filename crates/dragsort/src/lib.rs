#![forbid(unsafe_code)]

//! `dragsort` turns the children of a container into a drag-to-reorder list.
//!
//! Design goals:
//! - **Host-driven**: the embedding UI layer owns nodes, layout, listeners,
//!   and the clock, and exposes them through [`ReorderHost`]. The host pushes
//!   pointer input and viewport signals into a [`ReorderController`].
//! - **Deterministic time**: animation and refresh timers live in a queue
//!   owned by the controller and fire only from [`ReorderController::tick`].
//! - **Stable slots**: hit testing runs against a snapshot of child rects
//!   that relocations never disturb, so a drag behaves as a walk across a
//!   fixed grid of slots.
//!
//! ```text
//! pointer_down ─▶ resolve drag node ─▶ index ─▶ clone overlay ─▶ Armed
//! pointer_move ─▶ move overlay ─▶ hit test ─▶ relocate + animate ─▶ Dragging
//! pointer_up   ─▶ drag_end(old, new) ─▶ remove overlay ─▶ Idle
//! ```

pub mod animation;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod geometry_cache;
pub mod host;
pub mod index;
pub mod options;
pub mod reorder;
pub mod session;

pub use animation::{Animator, TimerKind};
pub use config::{DragElementResolver, DragEndCallback, ReorderConfig};
pub use controller::ReorderController;
pub use dispatch::{IgnoredReason, ReorderDispatch, ReorderLogEntry, ReorderOutcome, ReorderPhase};
pub use error::{ReorderError, ResolveError};
pub use geometry_cache::GeometryCache;
pub use host::{ControllerId, ReorderHost};
pub use index::{is_ancestor, resolve_index};
pub use options::{DEFAULT_DELAY, DEFAULT_REFRESH_DEBOUNCE, OptionsError, ReorderOptions};
pub use reorder::{Placement, Relocation, RelocationPlan, SlotMove, SlotState, plan_relocation};
pub use session::{CloneOverlay, DiffRecord, DiffSide, SessionState};

pub use dragsort_core::{
    Point, PointerButton, PointerEvent, Rect, StyleProperty, StyleTable, StyleValue, Subscription,
    Subscriptions, TimerId, ViewportSignal,
};
