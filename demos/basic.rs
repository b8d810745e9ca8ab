use flakeid::{Error, Generator};

fn main() -> Result<(), Error> {
    // Worker 1 with the default 41+10+12 layout and 2024 epoch.
    let generator = Generator::new(1)?;

    println!("Generated identifiers (strictly increasing):");
    for _ in 0..3 {
        let id = generator.generate()?;
        let (timestamp_ms, worker, sequence) = id.components();
        println!(
            "  {id}  ts={timestamp_ms}ms worker={worker} seq={sequence}  base62={} base58={} hex={}",
            id.base62(),
            id.base58(),
            id.hex()
        );
    }

    let metrics = generator.metrics();
    println!("\nMetrics: {metrics:?}");
    Ok(())
}
