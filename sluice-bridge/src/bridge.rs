// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::{BridgeConfig, ClosePolicy};
use crate::logging::debug;
use crate::next::Next;
use crate::slots::{deliver, Slots};
use core::fmt;
use core::future::Future;
use core::mem;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::oneshot;
use futures::stream::{FusedStream, Stream};
use parking_lot::Mutex;
use sluice_core::{Handler, PushSource, Result, Unsubscribe};
use std::sync::{Arc, Weak};

/// Observable lifecycle state of a [`PushPullBridge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Open with no outstanding pull. Values may be buffered.
    OpenIdle,
    /// Open with at least one pull waiting. The buffer is empty.
    OpenAwaiting,
    /// Closed. The subscription has been released.
    Closed,
}

/// Adapts a callback-driven [`PushSource`] into something a consumer pulls from.
///
/// Values pushed while nobody is pulling are buffered; pulls issued while
/// nothing is buffered wait for the next value. By default both sides are
/// served last-in first-out: the newest buffered value goes to the next pull,
/// and a new value resolves the most recently issued pull.
///
/// The bridge subscribes once, at construction, and releases the subscription
/// exactly once, on [`close`](Self::close) or on drop, whichever comes first.
///
/// The bridge also implements [`Stream`], so `while let Some(v) = bridge.next().await`
/// style loops and stream combinators work directly on it.
///
/// # Example
///
/// ```
/// use futures::FutureExt;
/// use sluice_bridge::PushPullBridge;
/// use sluice_core::EventTarget;
///
/// let button = EventTarget::<&str>::new();
/// let mut clicks = PushPullBridge::new(&button, "click").unwrap();
///
/// button.dispatch("click", "A");
/// button.dispatch("click", "B");
///
/// assert_eq!(clicks.next().now_or_never().unwrap().unwrap(), "B");
/// assert_eq!(clicks.next().now_or_never().unwrap().unwrap(), "A");
///
/// clicks.close();
/// assert_eq!(button.listener_count("click"), 0);
/// ```
pub struct PushPullBridge<T> {
    slots: Arc<Mutex<Slots<T>>>,
    unsubscribe: Option<Unsubscribe>,
    on_close: ClosePolicy,
    in_flight: Option<Next<T>>,
}

impl<T: Send + 'static> PushPullBridge<T> {
    /// Subscribes to `source` for `selector` with the default configuration.
    ///
    /// # Errors
    /// Returns the source's error if the subscription is refused.
    pub fn new<S>(source: &S, selector: &S::Selector) -> Result<Self>
    where
        S: PushSource<Item = T> + ?Sized,
    {
        Self::with_config(source, selector, BridgeConfig::default())
    }

    /// Subscribes to `source` for `selector` with an explicit configuration.
    ///
    /// # Errors
    /// Returns the source's error if the subscription is refused.
    pub fn with_config<S>(source: &S, selector: &S::Selector, config: BridgeConfig) -> Result<Self>
    where
        S: PushSource<Item = T> + ?Sized,
    {
        let slots = Arc::new(Mutex::new(Slots::new(config)));

        let handler: Handler<T> = {
            let slots: Weak<Mutex<Slots<T>>> = Arc::downgrade(&slots);
            Arc::new(move |value: T| {
                if let Some(slots) = slots.upgrade() {
                    deliver(&slots, value);
                }
            })
        };

        let unsubscribe = source.subscribe(selector, handler)?;
        debug!("bridge subscribed ({:?})", config);

        Ok(Self {
            slots,
            unsubscribe: Some(unsubscribe),
            on_close: config.on_close,
            in_flight: None,
        })
    }

    /// Requests the next value.
    ///
    /// If a value is buffered, the returned future is already resolved with it.
    /// Otherwise the pull waits for the next value the source pushes. After
    /// [`close`](Self::close) it resolves immediately to
    /// [`SluiceError::BridgeClosed`](sluice_core::SluiceError::BridgeClosed).
    pub fn next(&self) -> Next<T> {
        let mut slots = self.slots.lock();
        if slots.closed {
            return Next::closed();
        }
        if let Some(value) = slots.take_value() {
            return Next::ready(Arc::downgrade(&self.slots), value);
        }

        let (sender, receiver) = oneshot::channel();
        slots.waiters.push_back(sender);
        Next::waiting(Arc::downgrade(&self.slots), receiver, self.on_close)
    }
}

impl<T> PushPullBridge<T> {
    /// Releases the subscription and discards any buffered values.
    ///
    /// Idempotent. Pulls still pending are settled per the configured
    /// [`ClosePolicy`]. Values the source pushes afterwards are ignored.
    pub fn close(&mut self) {
        let Some(unsubscribe) = self.unsubscribe.take() else {
            return;
        };

        let (buffer, waiters) = {
            let mut slots = self.slots.lock();
            slots.closed = true;
            (
                mem::take(&mut slots.buffer),
                mem::take(&mut slots.waiters),
            )
        };
        self.in_flight = None;

        unsubscribe.unsubscribe();
        debug!(
            "bridge closed: discarded {} buffered value(s), settled {} pending pull(s)",
            buffer.len(),
            waiters.len()
        );
    }

    pub fn is_closed(&self) -> bool {
        self.unsubscribe.is_none()
    }

    /// Number of values waiting for a pull.
    pub fn buffered(&self) -> usize {
        self.slots.lock().buffer.len()
    }

    /// Number of pulls waiting for a value. Withdrawn pulls are not counted.
    pub fn pending_pulls(&self) -> usize {
        self.slots.lock().pending_pulls()
    }

    /// Number of values discarded by a bounded [`BufferPolicy`](crate::BufferPolicy).
    pub fn dropped(&self) -> u64 {
        self.slots.lock().dropped
    }

    pub fn config(&self) -> BridgeConfig {
        self.slots.lock().config
    }

    pub fn state(&self) -> BridgeState {
        let slots = self.slots.lock();
        if slots.closed {
            BridgeState::Closed
        } else if slots.pending_pulls() > 0 {
            BridgeState::OpenAwaiting
        } else {
            BridgeState::OpenIdle
        }
    }
}

// `T` is only ever moved out, never pinned.
impl<T> Unpin for PushPullBridge<T> {}

impl<T> Drop for PushPullBridge<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T> fmt::Debug for PushPullBridge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.lock();
        f.debug_struct("PushPullBridge")
            .field("closed", &slots.closed)
            .field("buffered", &slots.buffer.len())
            .field("pending_pulls", &slots.pending_pulls())
            .field("config", &slots.config)
            .finish()
    }
}

impl<T: Send + 'static> Stream for PushPullBridge<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = &mut *self;
        if this.is_closed() {
            return Poll::Ready(None);
        }

        // Re-polls reuse the same pull instead of queueing another one.
        let mut pull = this.in_flight.take().unwrap_or_else(|| this.next());
        match Pin::new(&mut pull).poll(cx) {
            Poll::Ready(Ok(value)) => Poll::Ready(Some(value)),
            Poll::Ready(Err(_)) => Poll::Ready(None),
            Poll::Pending => {
                this.in_flight = Some(pull);
                Poll::Pending
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_closed() {
            (0, Some(0))
        } else {
            (self.buffered(), None)
        }
    }
}

impl<T: Send + 'static> FusedStream for PushPullBridge<T> {
    fn is_terminated(&self) -> bool {
        self.is_closed()
    }
}
