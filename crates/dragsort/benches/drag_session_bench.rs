#![forbid(unsafe_code)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dragsort::{Point, PointerEvent, ReorderConfig, ReorderController};
use dragsort_harness::MockDom;
use std::hint::black_box;

const LABELS: [&str; 64] = [
    "00", "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "13", "14",
    "15", "16", "17", "18", "19", "20", "21", "22", "23", "24", "25", "26", "27", "28", "29",
    "30", "31", "32", "33", "34", "35", "36", "37", "38", "39", "40", "41", "42", "43", "44",
    "45", "46", "47", "48", "49", "50", "51", "52", "53", "54", "55", "56", "57", "58", "59",
    "60", "61", "62", "63",
];

fn row_center(index: usize) -> Point {
    Point::new(100.0, 25.0 + 50.0 * index as f64)
}

fn bench_drag_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("dragsort/session");

    for len in [8usize, 64] {
        group.bench_with_input(BenchmarkId::new("down_sweep_up", len), &len, |b, &len| {
            b.iter(|| {
                let (mut dom, root, items) = MockDom::column(&LABELS[..len]);
                let mut controller =
                    ReorderController::new(ReorderConfig::new().group_element(root), &mut dom)
                        .expect("controller should bind");
                let at = row_center(0);
                let down =
                    controller.pointer_down(&mut dom, &PointerEvent::primary(items[0], at.x, at.y));
                black_box(down.log.sequence);

                for slot in (0..len).chain((0..len).rev()) {
                    let dispatch = controller.pointer_move(&mut dom, row_center(slot));
                    black_box(dispatch.relocation.as_ref().map(|r| r.plan.drag_to));
                    dom.advance_ms(16);
                    black_box(controller.tick(&mut dom));
                }

                let up = controller.pointer_up(&mut dom, row_center(0));
                black_box(up.log.outcome);
            });
        });
    }

    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let (mut dom, root, _items) = MockDom::column(&LABELS);
    let mut controller = ReorderController::new(ReorderConfig::new().group_element(root), &mut dom)
        .expect("controller should bind");
    controller.refresh_geometry(&mut dom);

    c.bench_function("dragsort/geometry/hit_test_64", |b| {
        b.iter(|| {
            for slot in 0..LABELS.len() {
                black_box(controller.geometry().hit_test(black_box(row_center(slot))));
            }
        });
    });
}

criterion_group!(benches, bench_drag_session, bench_hit_test);
criterion_main!(benches);
