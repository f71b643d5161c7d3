// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::ClosePolicy;
use crate::slots::{restore, Slots};
use core::fmt;
use core::future::Future;
use core::mem;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::oneshot;
use parking_lot::Mutex;
use sluice_core::{Result, SluiceError};
use std::sync::Weak;

/// Future returned by [`PushPullBridge::next`](crate::PushPullBridge::next).
///
/// Resolves to the next value handed out by the bridge. Dropping it before it
/// resolves withdraws the pull; a value it already holds goes back to the
/// bridge for the next pull.
#[must_use = "futures do nothing unless polled"]
pub struct Next<T> {
    slots: Weak<Mutex<Slots<T>>>,
    state: NextState<T>,
}

enum NextState<T> {
    Ready(Result<T>),
    Waiting {
        receiver: oneshot::Receiver<T>,
        on_close: ClosePolicy,
    },
    Abandoned,
    Done,
}

impl<T> Next<T> {
    pub(crate) fn ready(slots: Weak<Mutex<Slots<T>>>, value: T) -> Self {
        Self {
            slots,
            state: NextState::Ready(Ok(value)),
        }
    }

    pub(crate) fn closed() -> Self {
        Self {
            slots: Weak::new(),
            state: NextState::Ready(Err(SluiceError::BridgeClosed)),
        }
    }

    pub(crate) fn waiting(
        slots: Weak<Mutex<Slots<T>>>,
        receiver: oneshot::Receiver<T>,
        on_close: ClosePolicy,
    ) -> Self {
        Self {
            slots,
            state: NextState::Waiting { receiver, on_close },
        }
    }
}

impl<T> Drop for Next<T> {
    fn drop(&mut self) {
        let value = match mem::replace(&mut self.state, NextState::Done) {
            NextState::Ready(Ok(value)) => value,
            NextState::Waiting { mut receiver, .. } => {
                // Closing first makes a concurrent delivery fail and retry elsewhere.
                receiver.close();
                match receiver.try_recv() {
                    Ok(Some(value)) => value,
                    _ => return,
                }
            }
            _ => return,
        };

        if let Some(slots) = self.slots.upgrade() {
            restore(&slots, value);
        }
    }
}

// `T` is only ever moved out, never pinned.
impl<T> Unpin for Next<T> {}

impl<T> Future for Next<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        match mem::replace(&mut this.state, NextState::Done) {
            NextState::Ready(result) => Poll::Ready(result),
            NextState::Waiting {
                mut receiver,
                on_close,
            } => match Pin::new(&mut receiver).poll(cx) {
                Poll::Ready(Ok(value)) => Poll::Ready(Ok(value)),
                Poll::Ready(Err(oneshot::Canceled)) => match on_close {
                    ClosePolicy::Reject => Poll::Ready(Err(SluiceError::BridgeClosed)),
                    ClosePolicy::Abandon => {
                        this.state = NextState::Abandoned;
                        Poll::Pending
                    }
                },
                Poll::Pending => {
                    this.state = NextState::Waiting { receiver, on_close };
                    Poll::Pending
                }
            },
            NextState::Abandoned => {
                this.state = NextState::Abandoned;
                Poll::Pending
            }
            NextState::Done => panic!("`Next` polled after completion"),
        }
    }
}

impl<T> fmt::Debug for Next<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            NextState::Ready(_) => "ready",
            NextState::Waiting { .. } => "waiting",
            NextState::Abandoned => "abandoned",
            NextState::Done => "done",
        };
        f.debug_struct("Next").field("state", &state).finish()
    }
}
