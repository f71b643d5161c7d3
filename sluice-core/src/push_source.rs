// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The capability every push source offers: register a handler, get back a
//! one-shot handle that removes it.
//!
//! Both DOM-style listener pairs (`add`/`remove`) and watch-style pairs
//! (`watch`/`unwatch`) fit the same shape, so consumers can stay generic over
//! [`PushSource`].

use crate::Result;
use core::fmt;
use std::sync::Arc;

/// Callback invoked by a push source each time it has a value.
pub type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// One-shot handle that tears down a subscription.
///
/// Dropping an `Unsubscribe` without calling [`unsubscribe`](Self::unsubscribe)
/// leaves the subscription registered.
#[must_use = "dropping an Unsubscribe leaves the handler registered"]
pub struct Unsubscribe {
    teardown: Box<dyn FnOnce() + Send + Sync>,
}

impl Unsubscribe {
    /// Wraps a teardown closure.
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            teardown: Box::new(teardown),
        }
    }

    /// A handle whose teardown does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Removes the subscription. Consumes the handle, so it runs at most once.
    pub fn unsubscribe(self) {
        (self.teardown)();
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").finish_non_exhaustive()
    }
}

/// A producer that invokes registered handlers on its own schedule.
///
/// `Selector` picks what to listen to: an event name, a watch expression, or
/// `()` for sources that only produce one kind of value.
pub trait PushSource {
    /// Values delivered to handlers.
    type Item: Send + 'static;

    /// What a subscriber selects on this source.
    type Selector: ?Sized;

    /// Registers `handler` for values matching `selector`.
    ///
    /// # Errors
    /// Returns an error if the source cannot accept the subscription.
    fn subscribe(&self, selector: &Self::Selector, handler: Handler<Self::Item>)
        -> Result<Unsubscribe>;
}

/// A [`PushSource`] built from a plain `subscribe(handler) -> unsubscribe` function.
pub struct FnSource<F, T> {
    subscribe: F,
    _item: core::marker::PhantomData<fn() -> T>,
}

/// Adapts any `Fn(Handler<T>) -> Unsubscribe` into a [`PushSource`] with a `()` selector.
///
/// ```
/// use sluice_core::{source_fn, Handler, PushSource, Unsubscribe};
/// use std::sync::{Arc, Mutex};
///
/// let slot: Arc<Mutex<Option<Handler<u32>>>> = Arc::new(Mutex::new(None));
/// let source = source_fn({
///     let slot = slot.clone();
///     move |handler: Handler<u32>| {
///         *slot.lock().unwrap() = Some(handler);
///         let slot = slot.clone();
///         Unsubscribe::new(move || *slot.lock().unwrap() = None)
///     }
/// });
///
/// let unsubscribe = source.subscribe(&(), Arc::new(|_: u32| {})).unwrap();
/// assert!(slot.lock().unwrap().is_some());
/// unsubscribe.unsubscribe();
/// assert!(slot.lock().unwrap().is_none());
/// ```
pub fn source_fn<F, T>(subscribe: F) -> FnSource<F, T>
where
    F: Fn(Handler<T>) -> Unsubscribe,
    T: Send + 'static,
{
    FnSource {
        subscribe,
        _item: core::marker::PhantomData,
    }
}

impl<F, T> PushSource for FnSource<F, T>
where
    F: Fn(Handler<T>) -> Unsubscribe,
    T: Send + 'static,
{
    type Item = T;
    type Selector = ();

    fn subscribe(&self, _selector: &(), handler: Handler<T>) -> Result<Unsubscribe> {
        Ok((self.subscribe)(handler))
    }
}
