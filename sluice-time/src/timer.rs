// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::Debug;
use core::ops::Sub;
use core::time::Duration;

/// Monotonic clock consulted by a [`RateGate`](crate::RateGate).
pub trait Timer: Clone + Send + Sync + Debug + 'static {
    type Instant: Copy
        + Debug
        + Ord
        + Send
        + Sync
        + Sub<Self::Instant, Output = Duration>;

    fn now(&self) -> Self::Instant;

    /// `instant + duration`, or `None` past the end of this clock.
    fn checked_add(&self, instant: Self::Instant, duration: Duration) -> Option<Self::Instant>;
}
