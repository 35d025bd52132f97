#![forbid(unsafe_code)]

//! Per-input results returned to the host.

use dragsort_core::geometry::Point;

use crate::host::ControllerId;
use crate::reorder::Relocation;

/// Input that produced a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderPhase {
    PointerDown,
    PointerMove,
    PointerUp,
    Cancel,
}

/// Why an input did not change session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// The controller was destroyed.
    Destroyed,
    /// Only the primary button starts a drag.
    ButtonNotAllowed,
    /// Pressing on the group element itself (between items) never drags.
    TargetIsGroup,
    /// A session is already active.
    SessionInProgress,
    /// The drag-element resolver returned no node.
    ResolverDeclined,
    /// The drag-element resolver failed.
    ResolverFailed,
    /// The node to drag is not inside any child of the group.
    IndexNotFound,
    /// The geometry snapshot has no slot for the node's index.
    SlotMissing,
    /// Move/up/cancel without an active session.
    NoActiveSession,
}

/// What an input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// A session started with the dragged node at `index`.
    Armed { index: usize },
    /// The overlay moved; `hit` is the slot under the pointer, if any.
    Moved { hit: Option<usize> },
    /// The dragged node moved from slot `from` to slot `to`.
    Relocated { from: usize, to: usize },
    /// The session ended normally.
    Completed { callback_invoked: bool },
    /// The session was torn down without a callback.
    Cancelled,
    Ignored(IgnoredReason),
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorderLogEntry {
    pub controller: ControllerId,
    pub phase: ReorderPhase,
    /// Monotonic per-controller sequence; `None` for ignored inputs.
    pub sequence: Option<u64>,
    pub position: Option<Point>,
    pub outcome: ReorderOutcome,
}

/// Result of handing one input to a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderDispatch<N> {
    /// The host should suppress its default handling (scroll, selection).
    pub prevent_default: bool,
    /// Relocation applied to the live child order, if any.
    pub relocation: Option<Relocation<N>>,
    pub log: ReorderLogEntry,
}

impl<N> ReorderDispatch<N> {
    pub(crate) fn ignored(
        controller: ControllerId,
        phase: ReorderPhase,
        reason: IgnoredReason,
        position: Option<Point>,
    ) -> Self {
        Self {
            prevent_default: false,
            relocation: None,
            log: ReorderLogEntry {
                controller,
                phase,
                sequence: None,
                position,
                outcome: ReorderOutcome::Ignored(reason),
            },
        }
    }

    /// The outcome recorded in the log entry.
    #[must_use]
    pub const fn outcome(&self) -> ReorderOutcome {
        self.log.outcome
    }

    /// Whether the input was ignored.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self.log.outcome, ReorderOutcome::Ignored(_))
    }
}
