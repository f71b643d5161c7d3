// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use sluice_core::{Handler, PushSource, Result, Unsubscribe};
use std::sync::Arc;

struct Recording<T> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
    selectors: Vec<String>,
    subscribe_calls: usize,
    unsubscribe_calls: usize,
    honors_unsubscribe: bool,
}

/// A push source driven by the test through [`emit`](Self::emit).
pub struct RecordingSource<T> {
    recording: Arc<Mutex<Recording<T>>>,
}

impl<T: Clone + Send + 'static> RecordingSource<T> {
    /// A source that removes handlers when unsubscribed.
    pub fn new() -> Self {
        Self::build(true)
    }

    /// A source that counts unsubscribe calls but keeps calling the handlers.
    pub fn ignoring_unsubscribe() -> Self {
        Self::build(false)
    }

    fn build(honors_unsubscribe: bool) -> Self {
        Self {
            recording: Arc::new(Mutex::new(Recording {
                next_id: 0,
                handlers: Vec::new(),
                selectors: Vec::new(),
                subscribe_calls: 0,
                unsubscribe_calls: 0,
                honors_unsubscribe,
            })),
        }
    }

    /// Calls every registered handler with `value`; returns how many were called.
    pub fn emit(&self, value: T) -> usize {
        let handlers: Vec<Handler<T>> = self
            .recording
            .lock()
            .handlers
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in &handlers {
            handler(value.clone());
        }
        handlers.len()
    }

    /// Emits each value in order.
    pub fn emit_all(&self, values: impl IntoIterator<Item = T>) {
        for value in values {
            self.emit(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.recording.lock().handlers.len()
    }

    pub fn subscribe_calls(&self) -> usize {
        self.recording.lock().subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.recording.lock().unsubscribe_calls
    }

    /// Selectors passed to `subscribe`, in call order.
    pub fn selectors(&self) -> Vec<String> {
        self.recording.lock().selectors.clone()
    }
}

impl<T: Clone + Send + 'static> Default for RecordingSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> PushSource for RecordingSource<T> {
    type Item = T;
    type Selector = str;

    fn subscribe(&self, selector: &str, handler: Handler<T>) -> Result<Unsubscribe> {
        let id = {
            let mut recording = self.recording.lock();
            let id = recording.next_id;
            recording.next_id += 1;
            recording.subscribe_calls += 1;
            recording.selectors.push(selector.to_owned());
            recording.handlers.push((id, handler));
            id
        };

        let recording = self.recording.clone();
        Ok(Unsubscribe::new(move || {
            let mut recording = recording.lock();
            recording.unsubscribe_calls += 1;
            if recording.honors_unsubscribe {
                recording.handlers.retain(|(handler_id, _)| *handler_id != id);
            }
        }))
    }
}
