use crate::*;

use position_tracker::{Alignment, PositionTracker, ScrollPosition, TrackerOptions};

fn tracker(item_count: usize, unmeasured_size: f64, low_size: f64) -> PositionTracker {
    PositionTracker::new(
        TrackerOptions::new(item_count)
            .with_unmeasured_size(unmeasured_size)
            .with_low_size(low_size),
    )
}

fn pos(index: usize, alignment: Alignment, offset: f64) -> ScrollPosition {
    ScrollPosition::new(index, alignment, offset)
}

#[test]
fn item_range_basics() {
    let r = ItemRange::new(5, 10);
    assert_eq!(r.len(), 5);
    assert!(!r.is_empty());
    assert!(r.contains(5));
    assert!(!r.contains(10));
    assert_eq!(r.indices().sum::<usize>(), 35);

    let inverted = ItemRange::new(7, 3);
    assert!(inverted.is_empty());
    assert_eq!(inverted.len(), 0);
}

#[test]
fn overscan_is_clamped_to_the_item_count() {
    assert_eq!(ItemRange::new(5, 10).with_overscan(3, 12), ItemRange::new(2, 12));
    assert_eq!(ItemRange::new(1, 4).with_overscan(2, 100), ItemRange::new(0, 6));
    assert_eq!(ItemRange::new(1, 4).with_overscan(0, 100), ItemRange::new(1, 4));
    assert_eq!(ItemRange::default().with_overscan(3, 12), ItemRange::default());
    assert_eq!(ItemRange::new(0, 4).with_overscan(1, 0), ItemRange::default());
}

#[test]
fn visible_range_of_an_empty_tracker() {
    let t = PositionTracker::default();
    assert!(visible_range(&t, &ScrollPosition::default(), 400.0).is_empty());
}

#[test]
fn visible_range_includes_the_item_at_the_trailing_edge() {
    let t = tracker(100, 20.0, 20.0);
    let r = visible_range(&t, &pos(8, Alignment::Start, 0.0), 400.0);
    assert_eq!(r, ItemRange::new(8, 29));
}

#[test]
fn visible_range_at_the_end() {
    let t = tracker(100, 20.0, 20.0);
    let r = visible_range(&t, &pos(99, Alignment::End, 0.0), 400.0);
    assert_eq!(r, ItemRange::new(80, 100));

    // An index past the end resolves against the last item.
    let r = visible_range(&t, &pos(150, Alignment::Start, 0.0), 400.0);
    assert_eq!(r, ItemRange::new(80, 100));
}

#[test]
fn visible_range_fills_backwards_at_the_end() {
    let t = tracker(100, 20.0, 10.0);
    let r = visible_range(&t, &pos(90, Alignment::Start, 0.0), 400.0);
    assert_eq!(r, ItemRange::new(61, 100));
}

#[test]
fn visible_range_fills_forwards_at_the_start() {
    let t = tracker(100, 20.0, 10.0);
    let r = visible_range(&t, &pos(10, Alignment::End, 0.0), 400.0);
    assert_eq!(r, ItemRange::new(0, 39));
}

#[test]
fn visible_range_reanchors_stale_positions() {
    let t = tracker(100, 20.0, 20.0);
    // Item 8 plus 95 lands inside item 12.
    let r = visible_range(&t, &pos(8, Alignment::Start, 95.0), 200.0);
    assert_eq!(r, ItemRange::new(12, 23));
}

#[test]
fn visible_range_uses_measured_sizes() {
    let mut t = tracker(100, 20.0, 20.0);
    for i in 0..100 {
        t.set_item_size(i, Some(50.0));
    }
    let r = visible_range(&t, &pos(10, Alignment::Start, 0.0), 200.0);
    assert_eq!(r, ItemRange::new(10, 15));
}

#[test]
fn viewport_settles_after_measuring() {
    let mut v = Viewport::new(PositionTracker::with_item_count(100), 200.0);
    assert_eq!(v.overscan(), DEFAULT_OVERSCAN);
    assert_eq!(v.rendered_range(), ItemRange::new(0, 18));

    let passes = v.settle(8, |_| Some(40.0));
    assert_eq!(passes, 2);
    assert_eq!(v.visible_range(), ItemRange::new(0, 6));
    assert_eq!(v.rendered_range(), ItemRange::new(0, 7));
    assert_eq!(v.tracker().total_size(), 18.0 * 40.0 + 82.0 * 18.0);

    // Nothing left to learn.
    assert_eq!(v.settle(8, |_| Some(40.0)), 1);
    assert_eq!(v.settle(8, |_| None), 1);
}

#[test]
fn viewport_scrolls_by_deltas() {
    let mut v = Viewport::new(
        PositionTracker::new(TrackerOptions::new(100).with_unmeasured_size(20.0)),
        200.0,
    );
    v.settle(8, |_| Some(40.0));

    assert_eq!(v.scroll_by(100.0), 100.0);
    assert_eq!(v.position(), pos(2, Alignment::Start, 20.0));
    assert_eq!(v.visible_range(), ItemRange::new(2, 8));

    assert_eq!(v.scroll_by(-30.0), 70.0);
    assert_eq!(v.position().alignment(), Alignment::End);

    assert_eq!(v.scroll_by(-10_000.0), 0.0);
    assert_eq!(v.position(), ScrollPosition::default());
}

#[test]
fn viewport_never_scrolls_past_the_last_full_view() {
    let mut v = Viewport::new(tracker(100, 20.0, 20.0), 400.0).with_overscan(1);
    v.scroll_to_index(95, Alignment::Start);
    assert_eq!(v.view_start_offset(), 1600.0);
    assert_eq!(v.visible_range(), ItemRange::new(80, 100));
    assert_eq!(v.rendered_range(), ItemRange::new(79, 100));

    assert_eq!(v.scroll_by(10_000.0), 1600.0);
    assert_eq!(v.position(), pos(99, Alignment::End, 0.0));

    // Settling stores the pinned position.
    v.scroll_to_index(95, Alignment::Start);
    v.settle(4, |_| None);
    assert_eq!(v.position(), pos(99, Alignment::End, 0.0));
}

#[test]
fn viewport_item_count_changes_keep_the_position_in_range() {
    let mut v = Viewport::new(tracker(100, 20.0, 20.0), 400.0);
    v.scroll_to_index(90, Alignment::Start);
    v.set_item_count(200);
    assert_eq!(v.position(), pos(90, Alignment::Start, 0.0));

    v.set_item_count(50);
    assert_eq!(v.position(), pos(49, Alignment::End, 0.0));
    assert_eq!(v.tracker().total_size(), 1000.0);

    v.set_item_count(0);
    assert_eq!(v.position(), ScrollPosition::default());
    assert!(v.visible_range().is_empty());
    assert!(v.rendered_range().is_empty());

    v.scroll_to_index(3, Alignment::Center);
    assert_eq!(v.position(), ScrollPosition::default());
}

#[test]
fn viewport_measurements_and_view_size() {
    let mut v = Viewport::new(tracker(10, 20.0, 20.0), 100.0);
    assert_eq!(v.measure(3, 45.0), None);
    assert_eq!(v.measure(3, 50.0), Some(45.0));
    assert_eq!(v.clear_measurement(3), Some(50.0));
    assert_eq!(v.measure(30, 50.0), None);

    v.set_view_size(f64::NAN);
    assert_eq!(v.view_size(), 100.0);
    v.set_view_size(-1.0);
    assert_eq!(v.view_size(), 100.0);
    v.set_view_size(60.0);
    assert_eq!(v.view_size(), 60.0);

    v.scroll_to(pos(4, Alignment::Center, 0.0));
    assert_eq!(v.view_start_offset(), 60.0);
    let tracker = v.into_tracker();
    assert_eq!(tracker.item_count(), 10);
}
