// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cooperative stop signal for consumer loops.
//!
//! A loop that pulls from a bridge races each pull against
//! [`CancellationToken::cancelled`]; whoever holds a clone of the token can end
//! the loop, which drops the bridge and releases its subscription.

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use event_listener::{Event, EventListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clonable stop signal; all clones share one state.
///
/// # Example
///
/// ```
/// use sluice_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
///
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    event: Event,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                event: Event::new(),
            }),
        }
    }

    /// Cancels the token and wakes every task waiting on it. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.event.notify(usize::MAX);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Resolves once the token is cancelled, immediately if it already is.
    ///
    /// The future shares the token's state, so it outlives `self`.
    pub fn cancelled(&self) -> Cancelled {
        Cancelled {
            inner: Arc::clone(&self.inner),
            listener: None,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`CancellationToken::cancelled`].
#[must_use = "futures do nothing unless polled"]
pub struct Cancelled {
    inner: Arc<Inner>,
    listener: Option<EventListener>,
}

impl Future for Cancelled {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = &mut *self;
        while !this.inner.cancelled.load(Ordering::Acquire) {
            let Some(listener) = this.listener.as_mut() else {
                // Registered before the flag is checked again, so a racing cancel() is seen.
                this.listener = Some(this.inner.event.listen());
                continue;
            };
            if Pin::new(listener).poll(cx).is_pending() {
                return Poll::Pending;
            }
            this.listener = None;
        }
        Poll::Ready(())
    }
}

impl fmt::Debug for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cancelled")
            .field("cancelled", &self.inner.cancelled.load(Ordering::Acquire))
            .field("listening", &self.listener.is_some())
            .finish()
    }
}
