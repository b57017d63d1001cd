use position_tracker::{Alignment, PositionTracker, ScrollPosition, TrackerOptions};

fn main() {
    let view_size = 300.0;
    let mut t = PositionTracker::new(TrackerOptions::new(500).with_unmeasured_size(20.0));

    let mut position = ScrollPosition::new(40, Alignment::Center, 0.0);
    println!(
        "{position:?}: view_start={}",
        position.view_start_offset(&t, view_size)
    );

    // Items above the anchor get measured; the anchored item stays put on screen.
    for i in 30..40 {
        t.set_item_size(i, Some(55.0));
    }
    println!(
        "after measuring: view_start={}",
        position.view_start_offset(&t, view_size)
    );

    for delta in [120.0, 120.0, -400.0] {
        position = position.scrolled_by(delta, &t, view_size);
        println!(
            "scrolled by {delta}: {position:?}, view_start={}",
            position.view_start_offset(&t, view_size)
        );
    }

    let end = position.change_alignment(Alignment::End, &t, view_size);
    println!("same view, end-aligned: {end:?}");
}
