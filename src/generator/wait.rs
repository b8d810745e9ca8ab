//! Cancellable sleeps and the hybrid next-time-unit wait.

use std::thread;
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::error::Error;

/// Poll granularity for cancellable sleeps; bounds cancellation latency.
const SLEEP_SLICE: Duration = Duration::from_millis(1);

/// Below this remainder a sleep is less accurate than spinning.
const MIN_SLEEP: Duration = Duration::from_micros(100);

/// Wake slightly early to absorb scheduler wake-up jitter; the yield loop
/// covers the rest.
const SLEEP_JITTER_MARGIN: Duration = Duration::from_micros(50);

/// Sleep for `duration`, returning [`Error::Canceled`] within one slice of
/// the token firing.
pub(crate) fn sleep_cancellable(duration: Duration, cancel: &CancelToken) -> Result<(), Error> {
    let deadline = Instant::now() + duration;
    loop {
        if cancel.is_canceled() {
            return Err(Error::Canceled);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}

/// Block until `now_units` passes `last_unit` and return the new reading.
///
/// Hybrid policy: sleep away most of `remaining` when it is long enough to
/// be worth a sleep, then poll the clock in a yield loop. The yield keeps
/// the final stretch precise without starving sibling threads.
pub(crate) fn wait_for_next_unit<F>(
    last_unit: i64,
    remaining: Duration,
    now_units: F,
    cancel: &CancelToken,
) -> Result<i64, Error>
where
    F: Fn() -> i64,
{
    if remaining > MIN_SLEEP {
        sleep_cancellable(remaining - SLEEP_JITTER_MARGIN, cancel)?;
    }
    loop {
        if cancel.is_canceled() {
            return Err(Error::Canceled);
        }
        let now = now_units();
        if now > last_unit {
            return Ok(now);
        }
        std::hint::spin_loop();
        thread::yield_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_completes_when_not_canceled() {
        let token = CancelToken::new();
        let start = Instant::now();
        sleep_cancellable(Duration::from_millis(5), &token).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn sleep_aborts_on_prefired_token() {
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            sleep_cancellable(Duration::from_secs(60), &token),
            Err(Error::Canceled)
        );
    }

    #[test]
    fn wait_returns_first_advanced_reading() {
        let token = CancelToken::new();
        let advanced = wait_for_next_unit(100, Duration::ZERO, || 101, &token).unwrap();
        assert_eq!(advanced, 101);
    }

    #[test]
    fn wait_aborts_on_prefired_token() {
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            wait_for_next_unit(100, Duration::ZERO, || 100, &token),
            Err(Error::Canceled)
        );
    }
}
