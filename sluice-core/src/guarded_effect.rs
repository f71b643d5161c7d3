// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Side effects guarded by the liveness of an update-cycle context.
//!
//! [`SafeApply::safe_apply`] runs an effect only while the context is alive:
//!
//! - destroyed context: nothing runs, returns `Ok(false)`
//! - cycle already active (on the context or its root): the effect runs inline
//! - otherwise: the context starts a new cycle that runs the effect
//!
//! Liveness is read on every call, never cached, since a context can be
//! destroyed between two values pulled by the same consumer.
//!
//! # Example
//!
//! ```
//! use sluice_core::{SafeApply, Scope};
//!
//! let scope = Scope::new();
//! assert!(scope.safe_apply(|| scope.set("data", 1)).unwrap());
//!
//! scope.destroy();
//! assert!(!scope.safe_apply(|| scope.set("data", 2)).unwrap());
//! assert_eq!(scope.get("data"), 1);
//! ```

use crate::Result;

/// A context that can be destroyed and that batches effects into update cycles.
pub trait EffectContext {
    /// Returns `true` once the context has been torn down.
    fn is_destroyed(&self) -> bool;

    /// Returns `true` if an update cycle is running on the context or its root.
    fn cycle_active(&self) -> bool;

    /// Starts a new update cycle that runs `effect`.
    ///
    /// # Errors
    /// Returns an error if the cycle cannot start or does not complete.
    fn schedule_cycle<F: FnOnce()>(&self, effect: F) -> Result<()>;
}

/// Runs effects only while their [`EffectContext`] is alive.
pub trait SafeApply: EffectContext {
    /// Runs or schedules `effect` unless the context is destroyed.
    ///
    /// Returns `Ok(true)` when the effect ran or was scheduled, `Ok(false)` when
    /// the context was destroyed and nothing happened.
    ///
    /// # Errors
    /// Propagates the failure of a newly started update cycle.
    fn safe_apply<F: FnOnce()>(&self, effect: F) -> Result<bool> {
        if self.is_destroyed() {
            return Ok(false);
        }

        if self.cycle_active() {
            effect();
        } else {
            self.schedule_cycle(effect)?;
        }
        Ok(true)
    }
}

impl<C: EffectContext> SafeApply for C {}
