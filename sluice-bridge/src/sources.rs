// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shorthands for bridging the push sources shipped with `sluice-core`.

use crate::bridge::PushPullBridge;
use serde_json::Value;
use sluice_core::{EventTarget, Result, Scope};

/// Bridges the `name` events dispatched on `target`.
///
/// # Errors
/// Returns [`SluiceError::SubscriptionError`](sluice_core::SluiceError::SubscriptionError)
/// if `name` is empty.
pub fn from_event<E>(target: &EventTarget<E>, name: &str) -> Result<PushPullBridge<E>>
where
    E: Clone + Send + 'static,
{
    PushPullBridge::new(target, name)
}

/// Bridges the successive values of `expr` on `scope`.
///
/// The first digest after creation delivers the expression's current value.
///
/// # Errors
/// Returns [`SluiceError::ScopeDestroyed`](sluice_core::SluiceError::ScopeDestroyed)
/// if `scope` was destroyed.
pub fn observe_on_scope(scope: &Scope, expr: &str) -> Result<PushPullBridge<Value>> {
    PushPullBridge::new(scope, expr)
}
