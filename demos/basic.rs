use position_tracker::{PositionTracker, TrackerOptions};

fn main() {
    let mut t = PositionTracker::new(
        TrackerOptions::new(1_000_000)
            .with_unmeasured_size(24.0)
            .with_low_size(16.0),
    );
    println!("estimated total_size={}", t.total_size());

    // A paint pass reports the sizes of the rows it rendered.
    let applied = t.set_item_sizes((500_000..500_040).map(|i| (i, 20.0 + (i % 7) as f64)));
    println!("applied {applied} measurements, total_size={}", t.total_size());

    let offset = t.item_stats(500_010).start + 3.0;
    println!("containing_index({offset})={}", t.containing_index(offset));
    println!("stats(500_010)={:?}", t.item_stats(500_010));

    t.set_item_count(250_000);
    println!("after truncation: total_size={}", t.total_size());
}
