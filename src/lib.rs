//! Distributed 64-bit unique identifier generation in the Snowflake family.
//!
//! Each identifier packs a wall-clock-derived timestamp, a worker identity
//! and a per-time-unit sequence number into one signed 64-bit word. A
//! generator with a unique worker identity emits a strictly increasing
//! stream of identifiers with no cross-node coordination.
//!
//! ## Quickstart
//!
//! ```
//! use flakeid::Generator;
//!
//! let generator = Generator::new(42)?;
//! let id = generator.generate()?;
//! println!("{} / {}", id, id.base62());
//! # Ok::<(), flakeid::Error>(())
//! ```
//!
//! ## Concurrent use
//!
//! A [`Generator`] is `Sync`; share it by reference or `Arc`:
//!
//! ```
//! use flakeid::Generator;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let generator = Arc::new(Generator::new(7)?);
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let generator = Arc::clone(&generator);
//!         thread::spawn(move || generator.generate().unwrap())
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok::<(), flakeid::Error>(())
//! ```
//!
//! ## Layouts
//!
//! The 63 usable bits can be re-partitioned to trade lifespan against node
//! count and throughput:
//!
//! ```
//! use flakeid::{BitLayout, Config, Generator};
//!
//! let config = Config::builder()
//!     .worker_id(65_000)
//!     .layout(BitLayout::SONYFLAKE)
//!     .build();
//! let generator = Generator::with_config(config)?;
//! # Ok::<(), flakeid::Error>(())
//! ```
//!
//! Identifiers generated under different layouts are not interoperable.

mod cancel;
mod codec;
mod config;
mod error;
mod generator;
mod id;
mod layout;
#[cfg(feature = "serde")]
mod serde;
#[cfg(test)]
mod tests;

pub use cancel::CancelToken;
pub use codec::{
    DecodeError, MAX_BASE2_LEN, MAX_BASE32_LEN, MAX_BASE36_LEN, MAX_BASE58_LEN, MAX_BASE62_LEN,
    MAX_BASE64_LEN, MAX_DECIMAL_LEN, MAX_HEX_LEN,
};
pub use config::{Config, ConfigBuilder, DEFAULT_EPOCH_MS, DEFAULT_MAX_CLOCK_BACKWARD};
pub use error::{BatchError, Error, OverflowKind};
pub use generator::{Generator, Metrics};
pub use id::FlakeId;
pub use layout::{BitLayout, LayoutCapacity, LayoutShifts, USABLE_BITS};

use std::sync::OnceLock;

// Process-wide generator for worker 0, initialized on first use. The
// construction error, if any, is cached and cloned out on every access.
static DEFAULT_GENERATOR: OnceLock<Result<Generator, Error>> = OnceLock::new();

fn default_generator() -> Result<&'static Generator, Error> {
    match DEFAULT_GENERATOR.get_or_init(|| Generator::new(0)) {
        Ok(generator) => Ok(generator),
        Err(e) => Err(e.clone()),
    }
}

/// Emit one identifier from the process-wide default generator (worker 0).
///
/// Suitable for single-node deployments; distributed systems should create
/// a [`Generator`] per node with a unique worker identity.
pub fn generate() -> Result<FlakeId, Error> {
    default_generator()?.generate()
}

/// Like [`generate`], aborting promptly if `cancel` fires during a wait.
pub fn generate_with_cancel(cancel: &CancelToken) -> Result<FlakeId, Error> {
    default_generator()?.generate_with_cancel(cancel)
}

/// Metrics snapshot of the process-wide default generator.
pub fn default_metrics() -> Result<Metrics, Error> {
    Ok(default_generator()?.metrics())
}
