#![forbid(unsafe_code)]

//! Controller construction, timers, listeners, and teardown.
//!
//! Run:
//!   cargo test -p dragsort --test controller_lifecycle

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use dragsort::{
    IgnoredReason, Point, PointerEvent, Rect, ReorderConfig, ReorderController, ReorderError,
    ReorderOutcome, StyleValue, Subscription, Subscriptions, ViewportSignal,
};
use dragsort_harness::{Axis, HostOp, MockDom, NodeId, SlotLayout};
use pretty_assertions::assert_eq;

fn row_center(index: usize) -> Point {
    Point::new(100.0, 25.0 + 50.0 * index as f64)
}

fn down(target: NodeId, index: usize) -> PointerEvent<NodeId> {
    let at = row_center(index);
    PointerEvent::primary(target, at.x, at.y)
}

/// Controller over a column whose initial geometry refresh already fired.
fn settled(labels: &[&str]) -> (MockDom, NodeId, Vec<NodeId>, ReorderController<NodeId>) {
    let (mut dom, group, items) = MockDom::column(labels);
    let mut controller =
        ReorderController::new(ReorderConfig::new().group_element(group), &mut dom).unwrap();
    dom.advance_ms(50);
    assert_eq!(controller.tick(&mut dom), 1);
    dom.take_journal();
    (dom, group, items, controller)
}

#[test]
fn missing_group_element_is_rejected_without_side_effects() {
    let mut dom = MockDom::new();
    let err = ReorderController::<NodeId>::new(ReorderConfig::new(), &mut dom).unwrap_err();
    assert_eq!(err, ReorderError::MissingGroupElement);
    assert_eq!(err.to_string(), "groupElement is required");
    assert!(dom.listeners().is_empty());
    assert!(dom.journal().is_empty());
}

#[test]
fn out_of_range_options_are_rejected() {
    let (mut dom, group, _items) = MockDom::column(&["a"]);
    let config = ReorderConfig::new()
        .group_element(group)
        .delay(Duration::from_secs(120));
    let err = ReorderController::new(config, &mut dom).unwrap_err();
    assert!(matches!(err, ReorderError::InvalidOptions(ref problems) if problems.len() == 1));
    assert!(dom.listeners().is_empty());
}

#[test]
fn construction_binds_persistent_listeners() {
    let (mut dom, group, _items) = MockDom::column(&["a", "b"]);
    let controller =
        ReorderController::new(ReorderConfig::new().group_element(group), &mut dom).unwrap();
    let id = controller.controller_id();

    assert_eq!(dom.subscriptions_for(id), Subscriptions::PERSISTENT);
    assert_eq!(controller.subscriptions(), Subscriptions::PERSISTENT);
    assert_eq!(dom.listener_target(id, Subscription::GroupPointerDown), Some(group));
    assert_eq!(dom.listener_target(id, Subscription::ScrollElementScroll), Some(group));
    assert_eq!(dom.listener_target(id, Subscription::WindowResize), None);
    assert!(controller.refresh_pending());
    assert!(controller.geometry().is_empty());
    assert_eq!(controller.next_deadline(), Some(Duration::from_millis(50)));
}

#[test]
fn explicit_scroll_element_gets_scroll_listener() {
    let (mut dom, group, _items) = MockDom::column(&["a"]);
    let viewport = dom.create_element("viewport");
    dom.append_child(viewport, group);
    let controller = ReorderController::new(
        ReorderConfig::new().group_element(group).scroll_element(viewport),
        &mut dom,
    )
    .unwrap();
    assert_eq!(
        dom.listener_target(controller.controller_id(), Subscription::ScrollElementScroll),
        Some(viewport)
    );
}

#[test]
fn initial_refresh_fires_after_debounce() {
    let (mut dom, group, _items) = MockDom::column(&["a", "b", "c"]);
    let mut controller =
        ReorderController::new(ReorderConfig::new().group_element(group), &mut dom).unwrap();

    dom.advance_ms(49);
    assert_eq!(controller.tick(&mut dom), 0);
    assert!(controller.geometry().is_empty());

    dom.advance_ms(1);
    assert_eq!(controller.tick(&mut dom), 1);
    assert_eq!(controller.geometry().len(), 3);
    assert!(!controller.refresh_pending());
    assert_eq!(controller.next_deadline(), None);
}

#[test]
fn viewport_signals_coalesce_into_one_refresh() {
    let (mut dom, group, _items, mut controller) = settled(&["a", "b"]);
    let before = controller.geometry().clone();

    dom.layout_slots(
        group,
        SlotLayout {
            origin: Point::new(0.0, -30.0),
            width: 200.0,
            height: 50.0,
            axis: Axis::Vertical,
        },
    );

    let start = dom.now();
    assert!(controller.notify_viewport_change(&mut dom, ViewportSignal::ContainerScroll));
    dom.advance_ms(20);
    controller.notify_viewport_change(&mut dom, ViewportSignal::WindowScroll);
    dom.advance_ms(20);
    controller.notify_viewport_change(&mut dom, ViewportSignal::WindowResize);
    assert_eq!(
        controller.next_deadline(),
        Some(start + Duration::from_millis(90))
    );

    dom.advance_ms(20);
    assert_eq!(controller.tick(&mut dom), 0);
    assert_eq!(controller.geometry(), &before);

    dom.advance_ms(30);
    assert_eq!(controller.tick(&mut dom), 1);
    assert_eq!(
        controller.geometry().slot(0),
        Some(Rect::from_origin_size(0.0, -30.0, 200.0, 50.0))
    );
}

#[test]
fn refresh_geometry_runs_now_and_drops_pending_refresh() {
    let (mut dom, group, _items) = MockDom::column(&["a", "b"]);
    let mut controller =
        ReorderController::new(ReorderConfig::new().group_element(group), &mut dom).unwrap();
    controller.refresh_geometry(&mut dom);
    assert_eq!(controller.geometry().len(), 2);
    assert!(!controller.refresh_pending());
    dom.advance_ms(100);
    assert_eq!(controller.tick(&mut dom), 0);
}

#[test]
fn displacement_animation_snaps_then_slides() {
    let (mut dom, _group, items, mut controller) = settled(&["a", "b", "c"]);

    controller.pointer_down(&mut dom, &down(items[1], 1));
    dom.take_journal();
    controller.pointer_move(&mut dom, row_center(2));

    let b = items[1];
    let ops: Vec<HostOp> = dom
        .journal()
        .iter()
        .filter(|op| match op {
            HostOp::SetStyle { node, .. } | HostOp::RemoveStyle { node, .. } => *node == b,
            HostOp::FlushLayout(node) => *node == b,
            _ => false,
        })
        .cloned()
        .collect();
    let set = |property: &str, value: StyleValue| HostOp::SetStyle {
        node: b,
        property: property.to_owned(),
        value: value.to_string(),
    };
    assert_eq!(
        ops,
        vec![
            set("transition", StyleValue::none()),
            set("transform", StyleValue::translate3d(0.0, -50.0)),
            HostOp::FlushLayout(b),
            set("transition", StyleValue::transition_all(Duration::from_millis(300))),
            set("transform", StyleValue::translate3d(0.0, 0.0)),
        ]
    );

    // The drop node slides up from the slot below.
    assert_eq!(
        dom.style(items[2], "transition"),
        Some(&StyleValue::keyword("all 300ms"))
    );
    assert_eq!(controller.active_animations(), 2);

    dom.advance_ms(300);
    assert_eq!(controller.tick(&mut dom), 2);
    assert_eq!(controller.active_animations(), 0);
    assert_eq!(dom.style(b, "transition"), None);
    assert_eq!(dom.style(b, "transform"), None);
    assert_eq!(dom.style(items[2], "transform"), None);
}

#[test]
fn reanimating_a_node_replaces_its_timer() {
    let (mut dom, group, items, mut controller) = settled(&["a", "b", "c"]);
    let b = items[1];

    controller.pointer_down(&mut dom, &down(b, 1));
    controller.pointer_move(&mut dom, row_center(2));
    let first = controller.pending_animation(&b).unwrap();

    dom.advance_ms(100);
    controller.pointer_move(&mut dom, row_center(1));
    assert_eq!(dom.labels(group), vec!["a", "b", "c"]);
    let second = controller.pending_animation(&b).unwrap();
    assert_ne!(first, second);
    assert_eq!(controller.active_animations(), 2);

    // The first timer's deadline passes without effect.
    dom.advance_ms(200);
    assert_eq!(controller.tick(&mut dom), 0);
    assert_eq!(
        dom.style(b, "transition"),
        Some(&StyleValue::transition_all(Duration::from_millis(300)))
    );

    dom.advance_ms(100);
    assert_eq!(controller.tick(&mut dom), 2);
    assert_eq!(dom.style(b, "transition"), None);
    assert_eq!(controller.pending_animation(&b), None);
}

#[test]
fn custom_delay_drives_transition_and_timer() {
    let (mut dom, group, items) = MockDom::column(&["a", "b"]);
    let config = ReorderConfig::new()
        .group_element(group)
        .delay(Duration::from_millis(120));
    let mut controller = ReorderController::new(config, &mut dom).unwrap();

    controller.pointer_down(&mut dom, &down(items[0], 0));
    controller.pointer_move(&mut dom, row_center(1));
    assert_eq!(
        dom.style(items[0], "transition"),
        Some(&StyleValue::keyword("all 120ms"))
    );
    dom.advance_ms(120);
    // Initial refresh (50ms) and both animation ends.
    assert_eq!(controller.tick(&mut dom), 3);
    assert_eq!(controller.active_animations(), 0);
}

#[test]
fn destroy_mid_drag_tears_everything_down() {
    let (mut dom, group, items) = MockDom::column(&["a", "b", "c"]);
    let called = Rc::new(Cell::new(false));
    let flag = Rc::clone(&called);
    let config = ReorderConfig::new()
        .group_element(group)
        .drag_end(move |_, _| flag.set(true));
    let mut controller = ReorderController::new(config, &mut dom).unwrap();

    controller.pointer_down(&mut dom, &down(items[0], 0));
    controller.pointer_move(&mut dom, row_center(1));
    assert_eq!(dom.overlays().len(), 1);

    controller.destroy(&mut dom);

    assert!(controller.is_destroyed());
    assert!(!called.get());
    assert!(dom.overlays().is_empty());
    assert!(dom.listeners().is_empty());
    assert_eq!(controller.subscriptions(), Subscriptions::empty());
    assert_eq!(controller.next_deadline(), None);
    assert!(controller.geometry().is_empty());
    assert_eq!(controller.active_animations(), 0);
    assert_eq!(dom.style(items[0], "transition"), None);
    assert_eq!(dom.style(items[1], "transform"), None);
    assert_eq!(dom.labels(group), vec!["b", "a", "c"]);

    dom.advance_ms(1_000);
    assert_eq!(controller.tick(&mut dom), 0);
    assert_eq!(
        controller.pointer_down(&mut dom, &down(items[2], 2)).outcome(),
        ReorderOutcome::Ignored(IgnoredReason::Destroyed)
    );
    assert!(!controller.notify_viewport_change(&mut dom, ViewportSignal::Structure));

    let ops = dom.journal().len();
    controller.destroy(&mut dom);
    assert_eq!(dom.journal().len(), ops);
}

#[test]
fn controllers_on_separate_groups_are_isolated() {
    let (mut dom, left, left_items) = MockDom::column(&["a", "b"]);
    let right = dom.create_element("right");
    let right_items: Vec<NodeId> = ["x", "y"]
        .iter()
        .map(|label| {
            let item = dom.create_element(label);
            dom.append_child(right, item);
            item
        })
        .collect();
    dom.layout_slots(
        right,
        SlotLayout {
            origin: Point::new(300.0, 0.0),
            width: 200.0,
            height: 50.0,
            axis: Axis::Vertical,
        },
    );

    let mut first =
        ReorderController::new(ReorderConfig::new().group_element(left), &mut dom).unwrap();
    let mut second =
        ReorderController::new(ReorderConfig::new().group_element(right), &mut dom).unwrap();
    assert_ne!(first.controller_id(), second.controller_id());
    assert_eq!(
        dom.listeners_for(Subscription::WindowResize),
        vec![first.controller_id(), second.controller_id()]
    );

    second.pointer_down(&mut dom, &PointerEvent::primary(right_items[0], 400.0, 25.0));
    assert_eq!(dom.subscriptions_for(first.controller_id()), Subscriptions::PERSISTENT);
    second.pointer_move(&mut dom, Point::new(400.0, 75.0));
    second.pointer_up(&mut dom, Point::new(400.0, 75.0));
    assert_eq!(dom.labels(right), vec!["y", "x"]);
    assert_eq!(dom.labels(left), vec!["a", "b"]);

    first.destroy(&mut dom);
    assert_eq!(dom.subscriptions_for(first.controller_id()), Subscriptions::empty());
    assert_eq!(dom.subscriptions_for(second.controller_id()), Subscriptions::PERSISTENT);

    first.pointer_down(&mut dom, &down(left_items[0], 0));
    assert_eq!(dom.labels(left), vec!["a", "b"]);
}

#[test]
fn webkit_prefix_used_when_host_lacks_property() {
    let (mut dom, group, items) = MockDom::column(&["a", "b"]);
    dom.mark_unsupported("transform");
    dom.mark_unsupported("transition");
    dom.mark_unsupported("user-select");
    let config = ReorderConfig::new()
        .group_element(group)
        .clone_element_style("user-select", "none");
    let mut controller = ReorderController::new(config, &mut dom).unwrap();
    assert_eq!(controller.style_table().name("user-select"), "-webkit-user-select");

    controller.pointer_down(&mut dom, &down(items[0], 0));
    controller.pointer_move(&mut dom, row_center(1));

    let overlay = controller.overlay().unwrap().node;
    assert_eq!(
        dom.style(overlay, "-webkit-user-select"),
        Some(&StyleValue::keyword("none"))
    );
    assert!(dom.style(overlay, "-webkit-transform").is_some());
    assert_eq!(dom.style(overlay, "transform"), None);
    assert_eq!(dom.style(overlay, "position"), Some(&StyleValue::keyword("fixed")));
    assert_eq!(
        dom.style(items[0], "-webkit-transition"),
        Some(&StyleValue::keyword("all 300ms"))
    );
}

#[test]
fn dispatch_sequence_counts_only_forwarded_inputs() {
    let (mut dom, _group, items, mut controller) = settled(&["a", "b"]);
    let ignored = controller.pointer_move(&mut dom, row_center(0));
    assert_eq!(ignored.log.sequence, None);
    assert_eq!(ignored.log.controller, controller.controller_id());

    let sequences: Vec<Option<u64>> = vec![
        controller.pointer_down(&mut dom, &down(items[0], 0)).log.sequence,
        controller.pointer_move(&mut dom, row_center(1)).log.sequence,
        controller.pointer_up(&mut dom, row_center(1)).log.sequence,
    ];
    assert_eq!(sequences, vec![Some(1), Some(2), Some(3)]);
}
