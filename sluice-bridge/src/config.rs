// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Which end of the buffer (and of the waiter queue) a pull is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryOrder {
    /// Newest buffered value first; the most recently issued pull is resolved first.
    #[default]
    Lifo,
    /// Oldest buffered value first; pulls are resolved in the order they were issued.
    Fifo,
}

/// What happens to pulls still pending when the bridge closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosePolicy {
    /// Pending pulls never resolve.
    #[default]
    Abandon,
    /// Pending pulls resolve to [`SluiceError::BridgeClosed`](sluice_core::SluiceError::BridgeClosed).
    Reject,
}

/// Bound applied to values buffered while nobody is pulling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferPolicy {
    #[default]
    Unbounded,
    /// Keep at most `n` values, discarding the oldest to make room.
    DropOldest(usize),
    /// Keep at most `n` values, discarding arrivals once full.
    DropNewest(usize),
}

impl BufferPolicy {
    pub(crate) const fn capacity(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::DropOldest(capacity) | Self::DropNewest(capacity) => Some(capacity),
        }
    }
}

/// Construction-time options of a [`PushPullBridge`](crate::PushPullBridge).
///
/// The default is the classic bridge: LIFO delivery, unbounded buffer, and
/// pending pulls abandoned on close.
///
/// ```
/// use sluice_bridge::{BridgeConfig, BufferPolicy, ClosePolicy, DeliveryOrder};
///
/// let config = BridgeConfig::new()
///     .with_order(DeliveryOrder::Fifo)
///     .with_close_policy(ClosePolicy::Reject)
///     .with_buffer(BufferPolicy::DropOldest(16));
///
/// assert_eq!(config.order, DeliveryOrder::Fifo);
/// assert_eq!(BridgeConfig::default().buffer, BufferPolicy::Unbounded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeConfig {
    pub order: DeliveryOrder,
    pub on_close: ClosePolicy,
    pub buffer: BufferPolicy,
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_order(mut self, order: DeliveryOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_close_policy(mut self, on_close: ClosePolicy) -> Self {
        self.on_close = on_close;
        self
    }

    #[must_use]
    pub fn with_buffer(mut self, buffer: BufferPolicy) -> Self {
        self.buffer = buffer;
        self
    }
}
