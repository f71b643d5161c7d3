// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension trait providing the `rate_gated` operator for streams.
//!
//! Each item is offered to a [`RateGate`]: items that pass are emitted, items
//! arriving while the gate is closed are dropped. This is leading-edge
//! throttling decided at arrival time, so no timer is ever scheduled.

use crate::logging::trace;
use crate::rate_gate::RateGate;
use crate::timer::Timer;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{ready, Stream};
use pin_project::pin_project;

#[cfg(feature = "runtime-tokio")]
use {crate::runtimes::tokio::TokioTimer, core::time::Duration};

pub trait RateGateExt: Stream + Sized {
    /// Emits an item only if `gate` lets it pass.
    fn rate_gated_by<TM: Timer>(self, gate: RateGate<TM>) -> impl Stream<Item = Self::Item> {
        RateGatedStream { stream: self, gate }
    }

    /// Emits the first item, then drops items until `delay` has elapsed since
    /// the last emitted one.
    ///
    /// ```rust
    /// # #[tokio::main(flavor = "current_thread", start_paused = true)]
    /// # async fn main() {
    /// use futures::StreamExt;
    /// use sluice_time::RateGateExt;
    /// use std::time::Duration;
    ///
    /// let burst = futures::stream::iter([1, 2, 3]);
    /// let gated: Vec<_> = burst.rate_gated(Duration::from_secs(1)).collect().await;
    ///
    /// assert_eq!(gated, vec![1]);
    /// # }
    /// ```
    #[cfg(feature = "runtime-tokio")]
    fn rate_gated(self, delay: Duration) -> impl Stream<Item = Self::Item> {
        self.rate_gated_by(RateGate::<TokioTimer>::new(delay))
    }
}

impl<S: Stream> RateGateExt for S {}

#[pin_project]
struct RateGatedStream<S, TM: Timer> {
    #[pin]
    stream: S,
    gate: RateGate<TM>,
}

impl<S, TM> Stream for RateGatedStream<S, TM>
where
    S: Stream,
    TM: Timer,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(item) => {
                    if this.gate.try_pass() {
                        return Poll::Ready(Some(item));
                    }
                    trace!(
                        "rate gate closed for another {:?}, item dropped",
                        this.gate.remaining()
                    );
                }
                None => return Poll::Ready(None),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.stream.size_hint();
        (0, upper)
    }
}
