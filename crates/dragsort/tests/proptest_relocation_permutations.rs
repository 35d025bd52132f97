#![forbid(unsafe_code)]

//! Property tests: any walk across slots keeps the child list a permutation
//! and matches a plain "move item to slot" model.
//!
//! Run:
//!   cargo test -p dragsort --test proptest_relocation_permutations

use dragsort::{Point, PointerEvent, ReorderConfig, ReorderController, ReorderOutcome};
use dragsort_harness::MockDom;
use proptest::prelude::*;

const LABELS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

fn row_center(index: usize) -> Point {
    Point::new(100.0, 25.0 + 50.0 * index as f64)
}

fn walk() -> impl Strategy<Value = (usize, usize, Vec<usize>)> {
    (2usize..=LABELS.len()).prop_flat_map(|len| {
        (
            Just(len),
            0..len,
            proptest::collection::vec(0..len, 1..24),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn walk_matches_move_to_slot_model((len, start, hits) in walk()) {
        let labels = &LABELS[..len];
        let (mut dom, group, items) = MockDom::column(labels);
        let mut controller =
            ReorderController::new(ReorderConfig::new().group_element(group), &mut dom).unwrap();

        let at = row_center(start);
        controller.pointer_down(&mut dom, &PointerEvent::primary(items[start], at.x, at.y));

        let mut model: Vec<String> = labels.iter().map(|label| (*label).to_owned()).collect();
        let mut position = start;
        for hit in hits {
            let dispatch = controller.pointer_move(&mut dom, row_center(hit));
            if hit == position {
                prop_assert_eq!(dispatch.outcome(), ReorderOutcome::Moved { hit: Some(hit) });
            } else {
                prop_assert_eq!(
                    dispatch.outcome(),
                    ReorderOutcome::Relocated { from: position, to: hit }
                );
                let item = model.remove(position);
                model.insert(hit, item);
                position = hit;
            }
            prop_assert_eq!(dom.labels(group), model.clone());
            let drag = controller.drag_state().unwrap();
            prop_assert_eq!(drag.index, position);
            prop_assert_eq!(drag.last_index, position);
            let current = dom.labels(group);
            prop_assert_eq!(current[position].as_str(), labels[start]);
        }

        let mut sorted = dom.labels(group);
        sorted.sort();
        prop_assert_eq!(sorted, labels.iter().map(|l| (*l).to_owned()).collect::<Vec<_>>());
        prop_assert_eq!(controller.geometry().len(), len);
    }

    #[test]
    fn at_most_one_timer_per_animated_node((len, start, hits) in walk()) {
        let (mut dom, group, items) = MockDom::column(&LABELS[..len]);
        let mut controller =
            ReorderController::new(ReorderConfig::new().group_element(group), &mut dom).unwrap();
        controller.refresh_geometry(&mut dom);

        let at = row_center(start);
        controller.pointer_down(&mut dom, &PointerEvent::primary(items[start], at.x, at.y));
        for hit in hits {
            controller.pointer_move(&mut dom, row_center(hit));
            dom.advance_ms(40);
            controller.tick(&mut dom);
            prop_assert!(controller.active_animations() <= len);
        }
        controller.pointer_up(&mut dom, Point::new(0.0, 0.0));

        dom.advance_ms(300);
        controller.tick(&mut dom);
        prop_assert_eq!(controller.active_animations(), 0);
        prop_assert_eq!(controller.next_deadline(), None);
        for item in &items {
            prop_assert!(dom.style(*item, "transition").is_none());
            prop_assert!(dom.style(*item, "transform").is_none());
        }
    }
}
