#![forbid(unsafe_code)]

//! Snapshot of child bounding boxes and hit testing against it.
//!
//! The cache is a grid of *slots*: rect `i` is where the `i`-th child sat
//! when the snapshot was taken. Reordering children does not refresh it, so
//! during a drag the rects keep describing positions, not the nodes that
//! currently occupy them.

use dragsort_core::geometry::{Point, Rect};

use crate::host::ReorderHost;

/// Ordered child rects, index-aligned with child order at capture time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryCache {
    rects: Vec<Rect>,
}

impl GeometryCache {
    /// Empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Cache holding `rects` as-is.
    #[must_use]
    pub fn from_rects(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    /// Replace the snapshot with the current bounding boxes of `group`'s
    /// children, in child order.
    pub fn refresh<H: ReorderHost>(&mut self, host: &H, group: &H::Node) {
        self.rects.clear();
        self.rects.extend(
            host.children(group)
                .iter()
                .map(|child| host.bounding_rect(child)),
        );
    }

    /// Drop every rect.
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Rect of slot `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<Rect> {
        self.rects.get(index).copied()
    }

    /// All slots in order.
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// First slot that strictly contains `point`, scanning in slot order.
    ///
    /// A point on a shared edge belongs to neither neighbour. When slots
    /// overlap the lowest index wins.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.rects
            .iter()
            .position(|rect| rect.contains_strict(point))
    }
}

#[cfg(test)]
mod tests {
    use super::GeometryCache;
    use dragsort_core::geometry::{Point, Rect};
    use proptest::prelude::*;

    fn row() -> GeometryCache {
        GeometryCache::from_rects(vec![
            Rect::new(0.0, 100.0, 0.0, 50.0),
            Rect::new(100.0, 200.0, 0.0, 50.0),
            Rect::new(200.0, 300.0, 0.0, 50.0),
        ])
    }

    #[test]
    fn hit_inside_slot() {
        let cache = row();
        assert_eq!(cache.hit_test(Point::new(50.0, 25.0)), Some(0));
        assert_eq!(cache.hit_test(Point::new(250.0, 25.0)), Some(2));
    }

    #[test]
    fn edge_point_is_not_a_hit() {
        let cache = row();
        assert_eq!(cache.hit_test(Point::new(0.0, 25.0)), None);
        assert_eq!(cache.hit_test(Point::new(100.0, 25.0)), None);
        assert_eq!(cache.hit_test(Point::new(150.0, 50.0)), None);
    }

    #[test]
    fn outside_every_slot_is_not_a_hit() {
        let cache = row();
        assert_eq!(cache.hit_test(Point::new(350.0, 25.0)), None);
        assert_eq!(cache.hit_test(Point::new(50.0, -1.0)), None);
    }

    #[test]
    fn overlapping_slots_first_wins() {
        let cache = GeometryCache::from_rects(vec![
            Rect::new(0.0, 100.0, 0.0, 100.0),
            Rect::new(50.0, 150.0, 50.0, 150.0),
        ]);
        assert_eq!(cache.hit_test(Point::new(75.0, 75.0)), Some(0));
        assert_eq!(cache.hit_test(Point::new(125.0, 125.0)), Some(1));
    }

    proptest! {
        #[test]
        fn stacked_slots_hit_their_own_interior(
            heights in proptest::collection::vec(1.0f64..80.0, 1..16),
            fraction in 0.01f64..0.99,
        ) {
            let mut top = 0.0;
            let mut rects = Vec::with_capacity(heights.len());
            for height in &heights {
                rects.push(Rect::from_origin_size(0.0, top, 120.0, *height));
                top += height;
            }
            let cache = GeometryCache::from_rects(rects.clone());
            for (index, rect) in rects.iter().enumerate() {
                let inside = Point::new(60.0, rect.top + rect.height() * fraction);
                prop_assert_eq!(cache.hit_test(inside), Some(index));
                prop_assert_eq!(cache.hit_test(Point::new(60.0, rect.top)), None);
                prop_assert_eq!(cache.hit_test(Point::new(0.0, inside.y)), None);
            }
        }
    }

    #[test]
    fn empty_cache_never_hits() {
        let cache = GeometryCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.hit_test(Point::new(1.0, 1.0)), None);
        assert_eq!(cache.slot(0), None);
    }
}
