use position_tracker::{Alignment, PositionTracker, TrackerOptions};
use position_tracker_adapter::Viewport;

fn main() {
    // Simulate a renderer whose rows turn out taller than estimated.
    let row_size = |i: usize| 30.0 + (i % 4) as f64 * 10.0;

    let tracker = PositionTracker::new(TrackerOptions::new(10_000).with_unmeasured_size(24.0));
    let mut v = Viewport::new(tracker, 480.0).with_overscan(2);

    let passes = v.settle(8, |i| Some(row_size(i)));
    println!("settled in {passes} passes, rendered={:?}", v.rendered_range());

    for delta in [250.0, 250.0, -100.0] {
        let view_start = v.scroll_by(delta);
        v.settle(8, |i| Some(row_size(i)));
        println!(
            "scroll_by({delta}): view_start={view_start}, visible={:?}",
            v.visible_range()
        );
    }

    v.scroll_to_index(9_999, Alignment::End);
    v.settle(8, |i| Some(row_size(i)));
    println!(
        "at end: view_start={}, total_size={}",
        v.view_start_offset(),
        v.tracker().total_size()
    );

    v.set_item_count(100);
    println!("after shrinking: position={:?}", v.position());
}
