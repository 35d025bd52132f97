#![forbid(unsafe_code)]

//! Per-gesture state: everything that lives between pointer-down and
//! pointer-up (or cancel).

use dragsort_core::geometry::{Point, Rect};

use crate::reorder::SlotState;

/// Coarse drag session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No gesture in progress.
    Idle,
    /// Pointer is down on a draggable node; it has not moved yet.
    Armed,
    /// At least one move was processed.
    Dragging,
}

/// One side of the completion report.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffSide<N> {
    pub node: Option<N>,
    pub rect: Option<Rect>,
}

impl<N> DiffSide<N> {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            node: None,
            rect: None,
        }
    }
}

impl<N> Default for DiffSide<N> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Before/after record handed to the completion callback.
///
/// `old` is the dragged node with the slot it started in. `new` is the node it
/// was last dropped onto, with the slot under the pointer at the last hit.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRecord<N> {
    pub old: DiffSide<N>,
    pub new: DiffSide<N>,
}

impl<N> Default for DiffRecord<N> {
    fn default() -> Self {
        Self {
            old: DiffSide::empty(),
            new: DiffSide::empty(),
        }
    }
}

/// Detached visual copy of the dragged node that follows the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct CloneOverlay<N> {
    pub node: N,
    /// Accumulated translation.
    pub x: f64,
    pub y: f64,
    /// Whether the host currently shows it.
    pub attached: bool,
}

impl<N> CloneOverlay<N> {
    pub(crate) fn new(node: N, origin: Point) -> Self {
        Self {
            node,
            x: origin.x,
            y: origin.y,
            attached: false,
        }
    }

    /// Shift by a pointer delta.
    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DragSession<N> {
    pub(crate) drag: SlotState<N>,
    pub(crate) drop: Option<SlotState<N>>,
    pub(crate) overlay: CloneOverlay<N>,
    pub(crate) diff: DiffRecord<N>,
    pub(crate) last_pointer: Point,
    pub(crate) moved: bool,
}

impl<N> DragSession<N> {
    pub(crate) const fn state(&self) -> SessionState {
        if self.moved {
            SessionState::Dragging
        } else {
            SessionState::Armed
        }
    }
}
