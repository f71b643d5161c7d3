// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::{BridgeConfig, BufferPolicy, DeliveryOrder};
use crate::logging::trace;
use futures::channel::oneshot;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Shared state of one bridge: values nobody has asked for yet, and pulls
/// nobody has answered yet. At most one of the two queues is non-empty.
pub(crate) struct Slots<T> {
    pub(crate) buffer: VecDeque<T>,
    pub(crate) waiters: VecDeque<oneshot::Sender<T>>,
    pub(crate) closed: bool,
    pub(crate) dropped: u64,
    pub(crate) config: BridgeConfig,
}

impl<T> Slots<T> {
    pub(crate) fn new(config: BridgeConfig) -> Self {
        Self {
            buffer: VecDeque::new(),
            waiters: VecDeque::new(),
            closed: false,
            dropped: 0,
            config,
        }
    }

    /// Removes the value the next pull should receive.
    pub(crate) fn take_value(&mut self) -> Option<T> {
        match self.config.order {
            DeliveryOrder::Lifo => self.buffer.pop_back(),
            DeliveryOrder::Fifo => self.buffer.pop_front(),
        }
    }

    /// Removes the pull the next value should resolve, skipping pulls whose
    /// future was dropped.
    pub(crate) fn take_waiter(&mut self) -> Option<oneshot::Sender<T>> {
        loop {
            let waiter = match self.config.order {
                DeliveryOrder::Lifo => self.waiters.pop_back(),
                DeliveryOrder::Fifo => self.waiters.pop_front(),
            }?;
            if !waiter.is_canceled() {
                return Some(waiter);
            }
        }
    }

    /// Buffers `value`, applying the configured bound.
    pub(crate) fn store(&mut self, value: T) {
        let Some(capacity) = self.config.buffer.capacity() else {
            self.buffer.push_back(value);
            return;
        };

        if self.buffer.len() < capacity {
            self.buffer.push_back(value);
            return;
        }

        self.dropped += 1;
        if let BufferPolicy::DropOldest(_) = self.config.buffer {
            if capacity > 0 {
                self.buffer.pop_front();
                self.buffer.push_back(value);
            }
        }
        trace!("buffer full, dropped a value (total dropped: {})", self.dropped);
    }

    /// Puts back a value a withdrawn pull had already received, at the end the
    /// configured order serves next. A full buffer gives up its least eligible value.
    pub(crate) fn put_back(&mut self, value: T) {
        match self.config.order {
            DeliveryOrder::Lifo => self.buffer.push_back(value),
            DeliveryOrder::Fifo => self.buffer.push_front(value),
        }

        let Some(capacity) = self.config.buffer.capacity() else {
            return;
        };
        if self.buffer.len() > capacity {
            self.dropped += 1;
            match self.config.order {
                DeliveryOrder::Lifo => self.buffer.pop_front(),
                DeliveryOrder::Fifo => self.buffer.pop_back(),
            };
            trace!("buffer full, dropped a value (total dropped: {})", self.dropped);
        }
    }

    pub(crate) fn pending_pulls(&self) -> usize {
        self.waiters
            .iter()
            .filter(|waiter| !waiter.is_canceled())
            .count()
    }
}

/// Hands `value` to the most eligible pending pull, or buffers it.
pub(crate) fn deliver<T>(slots: &Mutex<Slots<T>>, value: T) {
    hand_off(slots, value, Slots::store);
}

/// Returns a value from a withdrawn pull: another pending pull gets it first,
/// otherwise it goes back to the front of the line.
pub(crate) fn restore<T>(slots: &Mutex<Slots<T>>, value: T) {
    hand_off(slots, value, Slots::put_back);
}

// The lock is released before a pull is resolved. A pull dropped between
// being taken and being resolved hands the value back for another attempt.
fn hand_off<T>(slots: &Mutex<Slots<T>>, value: T, park: fn(&mut Slots<T>, T)) {
    let mut value = value;
    loop {
        let waiter = {
            let mut slots = slots.lock();
            if slots.closed {
                trace!("event ignored: bridge closed");
                return;
            }
            match slots.take_waiter() {
                Some(waiter) => waiter,
                None => {
                    park(&mut *slots, value);
                    return;
                }
            }
        };

        match waiter.send(value) {
            Ok(()) => return,
            Err(returned) => value = returned,
        }
    }
}
