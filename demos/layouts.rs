use flakeid::{BitLayout, Config, Error, Generator};

fn main() -> Result<(), Error> {
    println!("Preset layout capacities:");
    for layout in BitLayout::PRESETS {
        println!(
            "  {}+{}+{} @ {:?}: {}",
            layout.timestamp_bits,
            layout.worker_bits,
            layout.sequence_bits,
            layout.time_unit,
            layout.capacity()
        );
    }

    // A Sonyflake-style deployment: 65k workers at 10ms precision.
    let config = Config::builder()
        .worker_id(40_000)
        .layout(BitLayout::SONYFLAKE)
        .build();
    let generator = Generator::with_config(config)?;
    let id = generator.generate()?;

    let layout = generator.layout();
    let (timestamp_ms, worker, sequence) =
        id.components_with_layout(&layout, generator.epoch_ms());
    println!("\nSonyflake-style id {id}: ts={timestamp_ms}ms worker={worker} seq={sequence}");
    Ok(())
}
