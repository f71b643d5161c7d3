// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::timer::Timer;
use core::time::Duration;

#[cfg(feature = "runtime-tokio")]
use crate::runtimes::tokio::TokioTimer;

/// Leading-edge rate limiter.
///
/// The first [`try_pass`](Self::try_pass) succeeds. Each success closes the
/// gate for `delay`; calls made while it is closed fail without extending the
/// window. The first call at or after the window's end succeeds again.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "runtime-tokio")]
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() {
/// use sluice_time::RateGate;
/// use std::time::Duration;
///
/// let mut gate = RateGate::new(Duration::from_secs(1));
///
/// assert!(gate.try_pass());
/// assert!(!gate.try_pass());
///
/// tokio::time::advance(Duration::from_secs(1)).await;
/// assert!(gate.try_pass());
/// # }
/// # #[cfg(not(feature = "runtime-tokio"))]
/// # fn main() {}
/// ```
#[derive(Debug, Clone)]
pub struct RateGate<TM: Timer> {
    delay: Duration,
    timer: TM,
    reopens: Reopens<TM::Instant>,
}

#[derive(Debug, Clone, Copy)]
enum Reopens<I> {
    Open,
    At(I),
    // The window outlasts the clock.
    Never,
}

#[cfg(feature = "runtime-tokio")]
impl RateGate<TokioTimer> {
    /// A gate on tokio's clock.
    pub fn new(delay: Duration) -> Self {
        Self::with_timer(delay, TokioTimer)
    }
}

impl<TM: Timer> RateGate<TM> {
    pub fn with_timer(delay: Duration, timer: TM) -> Self {
        Self {
            delay,
            timer,
            reopens: Reopens::Open,
        }
    }

    /// Returns `true` and closes the gate for `delay` if it is open;
    /// returns `false` otherwise.
    ///
    /// A `delay` past the end of the clock lets exactly one call through.
    pub fn try_pass(&mut self) -> bool {
        let now = self.timer.now();
        match self.reopens {
            Reopens::Never => return false,
            Reopens::At(reopens_at) if now < reopens_at => return false,
            _ => {}
        }
        self.reopens = match self.timer.checked_add(now, self.delay) {
            Some(reopens_at) => Reopens::At(reopens_at),
            None => Reopens::Never,
        };
        true
    }

    pub fn is_open(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Time left until the gate reopens; zero when open.
    ///
    /// A gate that never reopens reports [`Duration::MAX`].
    pub fn remaining(&self) -> Duration {
        match self.reopens {
            Reopens::Open => Duration::ZERO,
            Reopens::At(reopens_at) => {
                let now = self.timer.now();
                if now < reopens_at {
                    reopens_at - now
                } else {
                    Duration::ZERO
                }
            }
            Reopens::Never => Duration::MAX,
        }
    }

    /// Reopens the gate immediately.
    pub fn reset(&mut self) {
        self.reopens = Reopens::Open;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, Default)]
    struct ManualTimer {
        millis: Arc<AtomicU64>,
    }

    impl ManualTimer {
        fn advance(&self, millis: u64) {
            self.millis.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Timer for ManualTimer {
        type Instant = Duration;

        fn now(&self) -> Duration {
            Duration::from_millis(self.millis.load(Ordering::SeqCst))
        }

        fn checked_add(&self, instant: Duration, duration: Duration) -> Option<Duration> {
            instant.checked_add(duration)
        }
    }

    #[test]
    fn first_call_passes() {
        let mut gate = RateGate::with_timer(Duration::from_millis(1000), ManualTimer::default());

        assert!(gate.is_open());
        assert!(gate.try_pass());
        assert!(!gate.is_open());
    }

    #[test]
    fn rejected_calls_do_not_extend_the_window() {
        let timer = ManualTimer::default();
        let mut gate = RateGate::with_timer(Duration::from_millis(1000), timer.clone());
        assert!(gate.try_pass());

        timer.advance(600);
        assert!(!gate.try_pass());
        timer.advance(399);
        assert!(!gate.try_pass());
        timer.advance(1);

        assert!(gate.try_pass());
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        let timer = ManualTimer::default();
        let mut gate = RateGate::with_timer(Duration::from_millis(500), timer.clone());
        assert_eq!(gate.remaining(), Duration::ZERO);

        gate.try_pass();
        timer.advance(200);
        assert_eq!(gate.remaining(), Duration::from_millis(300));

        timer.advance(400);
        assert_eq!(gate.remaining(), Duration::ZERO);
    }

    #[test]
    fn zero_delay_always_passes() {
        let mut gate = RateGate::with_timer(Duration::ZERO, ManualTimer::default());

        assert!(gate.try_pass());
        assert!(gate.try_pass());
    }

    #[test]
    fn delay_past_end_of_clock_passes_once() {
        let timer = ManualTimer::default();
        timer.advance(1);
        let mut gate = RateGate::with_timer(Duration::MAX, timer.clone());

        assert!(gate.try_pass());
        timer.advance(u64::MAX / 2);

        assert!(!gate.try_pass());
        assert!(!gate.is_open());
        assert_eq!(gate.remaining(), Duration::MAX);

        gate.reset();
        assert!(gate.try_pass());
    }

    #[test]
    fn reset_reopens_immediately() {
        let mut gate = RateGate::with_timer(Duration::from_secs(60), ManualTimer::default());
        gate.try_pass();

        gate.reset();

        assert!(gate.try_pass());
        assert_eq!(gate.delay(), Duration::from_secs(60));
    }
}
