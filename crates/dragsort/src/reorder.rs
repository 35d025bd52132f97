#![forbid(unsafe_code)]

//! Moving the dragged node next to the drop target.
//!
//! # Directional insertion
//!
//! The side the dragged node lands on depends on the direction of travel:
//!
//! - moving forward (`drag < drop`), it is inserted **after** the drop node,
//!   which shifts back by one to `drop - 1`;
//! - moving backward, it is inserted **before** the drop node, which shifts
//!   forward by one to `drop + 1`.
//!
//! Either way the drop node ends up in the slot next to where the dragged
//! node departed from, so each relocation is one clean exchange of slots.

use crate::host::ReorderHost;

/// Position bookkeeping for the dragged node or the node under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotState<N> {
    /// The node being tracked.
    pub element: N,
    /// Current index in the child order.
    pub index: usize,
    /// Index before the most recent relocation; origin of the next animation.
    pub last_index: usize,
}

impl<N> SlotState<N> {
    /// State for a node that has not moved yet.
    #[must_use]
    pub const fn at(element: N, index: usize) -> Self {
        Self {
            element,
            index,
            last_index: index,
        }
    }
}

/// Which side of the drop node the dragged node is inserted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// Index arithmetic for one relocation, independent of any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocationPlan {
    pub placement: Placement,
    /// New index of the dragged node.
    pub drag_to: usize,
    /// New index of the drop node.
    pub drop_to: usize,
}

/// Compute where the dragged and drop nodes end up.
///
/// `None` when the indices are equal (nothing to do).
#[must_use]
pub fn plan_relocation(drag_index: usize, drop_index: usize) -> Option<RelocationPlan> {
    if drag_index == drop_index {
        return None;
    }
    Some(if drag_index < drop_index {
        RelocationPlan {
            placement: Placement::After,
            drag_to: drop_index,
            drop_to: drop_index - 1,
        }
    } else {
        RelocationPlan {
            placement: Placement::Before,
            drag_to: drop_index,
            drop_to: drop_index + 1,
        }
    })
}

/// One node sliding between two cached slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMove<N> {
    pub element: N,
    pub from_slot: usize,
    pub to_slot: usize,
}

/// Result of a relocation applied to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation<N> {
    pub plan: RelocationPlan,
    /// Drop node state after the move (`index == last_index`).
    pub drop: SlotState<N>,
    /// Displacements to animate: dragged node first, then the drop node.
    pub moves: [SlotMove<N>; 2],
}

impl<N> Relocation<N> {
    /// Slot the dragged node left.
    #[must_use]
    pub fn from(&self) -> usize {
        self.moves[0].from_slot
    }

    /// Slot the dragged node now occupies.
    #[must_use]
    pub fn to(&self) -> usize {
        self.moves[0].to_slot
    }
}

/// Move `drag` next to the child currently at `drop_index`.
///
/// No-op (returns `None`) when the indices match, when the child at
/// `drop_index` is the dragged node itself, or when `drop_index` is past the
/// end of the live child list. On success the live order has changed, both
/// `drag` and the returned drop state have `last_index == index`, and the
/// returned moves describe the slot changes to animate.
pub fn relocate<H: ReorderHost>(
    host: &mut H,
    group: &H::Node,
    drag: &mut SlotState<H::Node>,
    drop_index: usize,
) -> Option<Relocation<H::Node>> {
    let plan = plan_relocation(drag.index, drop_index)?;
    let drop_element = host.children(group).into_iter().nth(drop_index)?;
    if drop_element == drag.element {
        return None;
    }

    match plan.placement {
        Placement::After => {
            let reference = host.next_sibling(&drop_element);
            host.insert_before(group, &drag.element, reference.as_ref());
        }
        Placement::Before => {
            host.insert_before(group, &drag.element, Some(&drop_element));
        }
    }

    let drag_move = SlotMove {
        element: drag.element.clone(),
        from_slot: drag.last_index,
        to_slot: plan.drag_to,
    };
    let drop_move = SlotMove {
        element: drop_element.clone(),
        from_slot: drop_index,
        to_slot: plan.drop_to,
    };

    drag.index = plan.drag_to;
    drag.last_index = plan.drag_to;

    Some(Relocation {
        plan,
        drop: SlotState::at(drop_element, plan.drop_to),
        moves: [drag_move, drop_move],
    })
}
