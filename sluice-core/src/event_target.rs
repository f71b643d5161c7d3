// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! DOM-style event target: named events, listener registration, synchronous dispatch.
//!
//! ## Characteristics
//!
//! - **Synchronous**: [`dispatch`](EventTarget::dispatch) calls every listener
//!   before returning, in registration order.
//! - **Re-entrant**: listeners run on a snapshot, so they may add or remove
//!   listeners (or dispatch again) without deadlocking.
//! - **Thread-safe**: cheap to clone; all clones share the same listeners.
//!
//! ## Example
//!
//! ```
//! use sluice_core::EventTarget;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let button = EventTarget::<&'static str>::new();
//! let clicks = Arc::new(AtomicUsize::new(0));
//!
//! let id = button.add_event_listener("click", {
//!     let clicks = clicks.clone();
//!     Arc::new(move |_: &'static str| {
//!         clicks.fetch_add(1, Ordering::SeqCst);
//!     })
//! });
//!
//! assert_eq!(button.dispatch("click", "first"), 1);
//! assert!(button.remove_event_listener("click", id));
//! assert_eq!(button.dispatch("click", "second"), 0);
//! assert_eq!(clicks.load(Ordering::SeqCst), 1);
//! ```

use crate::push_source::{Handler, PushSource, Unsubscribe};
use crate::{Result, SluiceError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listeners<E> {
    next_id: u64,
    by_event: HashMap<String, Vec<(ListenerId, Handler<E>)>>,
}

/// A source of named events, each delivered to the listeners registered for its name.
pub struct EventTarget<E> {
    listeners: Arc<Mutex<Listeners<E>>>,
}

impl<E: Clone + Send + 'static> EventTarget<E> {
    /// Creates a target with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                by_event: HashMap::new(),
            })),
        }
    }

    /// Registers `handler` for events named `name`.
    pub fn add_event_listener(&self, name: &str, handler: Handler<E>) -> ListenerId {
        let mut listeners = self.listeners.lock();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners
            .by_event
            .entry(name.to_owned())
            .or_default()
            .push((id, handler));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered under `name`.
    pub fn remove_event_listener(&self, name: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(registered) = listeners.by_event.get_mut(name) else {
            return false;
        };

        let before = registered.len();
        registered.retain(|(listener_id, _)| *listener_id != id);
        let removed = registered.len() != before;

        if registered.is_empty() {
            listeners.by_event.remove(name);
        }
        removed
    }

    /// Delivers `event` to every listener registered for `name`.
    ///
    /// Returns the number of listeners invoked. Listener panics propagate to the caller.
    pub fn dispatch(&self, name: &str, event: E) -> usize {
        let snapshot: Vec<Handler<E>> = self
            .listeners
            .lock()
            .by_event
            .get(name)
            .map(|registered| registered.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        for handler in &snapshot {
            handler(event.clone());
        }
        snapshot.len()
    }

    /// Number of listeners registered for `name`.
    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners
            .lock()
            .by_event
            .get(name)
            .map_or(0, Vec::len)
    }
}

impl<E: Clone + Send + 'static> Default for EventTarget<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventTarget<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<E: Clone + Send + 'static> PushSource for EventTarget<E> {
    type Item = E;
    type Selector = str;

    /// Registers `handler` for `name`.
    ///
    /// # Errors
    /// Returns [`SluiceError::SubscriptionError`] if `name` is empty.
    fn subscribe(&self, name: &str, handler: Handler<E>) -> Result<Unsubscribe> {
        if name.is_empty() {
            return Err(SluiceError::subscription_error("event name must not be empty"));
        }
        let id = self.add_event_listener(name, handler);
        let target = self.clone();
        let name = name.to_owned();
        Ok(Unsubscribe::new(move || {
            target.remove_event_listener(&name, id);
        }))
    }
}
