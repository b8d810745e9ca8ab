use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use flakeid::{Error, Generator};

fn main() -> Result<(), Error> {
    // One generator per simulated node; worker identities must be unique
    // across nodes for identifiers to be globally unique.
    let mut handles = vec![];
    for worker in 0..4u32 {
        handles.push(thread::spawn(move || {
            let generator = Arc::new(Generator::new(worker).unwrap());
            let threads: Vec<_> = (0..4)
                .map(|_| {
                    let generator = Arc::clone(&generator);
                    thread::spawn(move || {
                        (0..1_000)
                            .map(|_| generator.generate().unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            threads
                .into_iter()
                .flat_map(|t| t.join().unwrap())
                .collect::<Vec<_>>()
        }));
    }

    let mut union = HashSet::new();
    let mut total = 0usize;
    for handle in handles {
        let ids = handle.join().unwrap();
        total += ids.len();
        union.extend(ids);
    }

    println!("{total} identifiers from 4 workers x 4 threads, {} unique", union.len());
    assert_eq!(total, union.len());
    Ok(())
}
