// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use serde_json::{json, Value};
use sluice_core::{EffectContext, Result, SafeApply, Scope, SluiceError};
use std::cell::Cell;
use std::sync::Arc;

#[derive(Default)]
struct FlagContext {
    destroyed: Cell<bool>,
    cycle_active: Cell<bool>,
    scheduled: Cell<usize>,
}

impl EffectContext for FlagContext {
    fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    fn cycle_active(&self) -> bool {
        self.cycle_active.get()
    }

    fn schedule_cycle<F: FnOnce()>(&self, effect: F) -> Result<()> {
        self.scheduled.set(self.scheduled.get() + 1);
        self.cycle_active.set(true);
        effect();
        self.cycle_active.set(false);
        Ok(())
    }
}

#[test]
fn test_destroyed_context_skips_effect() -> anyhow::Result<()> {
    // Arrange
    let context = FlagContext::default();
    context.destroyed.set(true);
    let ran = Cell::new(false);

    // Act
    let applied = context.safe_apply(|| ran.set(true))?;

    // Assert
    assert!(!applied);
    assert!(!ran.get());
    assert_eq!(context.scheduled.get(), 0);
    Ok(())
}

#[test]
fn test_active_cycle_runs_effect_inline() -> anyhow::Result<()> {
    // Arrange
    let context = FlagContext::default();
    context.cycle_active.set(true);
    let ran = Cell::new(false);

    // Act
    let applied = context.safe_apply(|| ran.set(true))?;

    // Assert
    assert!(applied);
    assert!(ran.get());
    assert_eq!(context.scheduled.get(), 0);
    Ok(())
}

#[test]
fn test_idle_context_schedules_a_cycle() -> anyhow::Result<()> {
    // Arrange
    let context = FlagContext::default();
    let ran = Cell::new(false);

    // Act
    let applied = context.safe_apply(|| ran.set(true))?;

    // Assert
    assert!(applied);
    assert!(ran.get());
    assert_eq!(context.scheduled.get(), 1);
    Ok(())
}

#[test]
fn test_destroyed_state_is_rechecked_on_every_call() -> anyhow::Result<()> {
    // Arrange
    let context = FlagContext::default();

    // Act
    let first = context.safe_apply(|| {})?;
    context.destroyed.set(true);
    let second = context.safe_apply(|| {})?;

    // Assert
    assert!(first);
    assert!(!second);
    Ok(())
}

#[test]
fn test_scope_effect_from_watcher_runs_inside_running_digest() -> anyhow::Result<()> {
    // Arrange
    let scope = Scope::new();
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    scope.watch("search", {
        let scope = scope.clone();
        let outcomes = outcomes.clone();
        Arc::new(move |value: Value| {
            let outcome = scope.safe_apply(|| scope.set("data", value));
            outcomes.lock().push(outcome.ok());
        })
    })?;

    // Act
    scope.apply(|| scope.set("search", "rust"))?;

    // Assert
    assert_eq!(*outcomes.lock(), vec![Some(true)]);
    assert_eq!(scope.get("data"), json!("rust"));
    Ok(())
}

#[test]
fn test_scope_effect_failure_is_propagated() {
    // Arrange
    let scope = Scope::new();
    scope
        .watch("counter", {
            let scope = scope.clone();
            Arc::new(move |value: Value| scope.set("counter", value.as_u64().unwrap_or(0) + 1))
        })
        .unwrap();

    // Act
    let result = scope.safe_apply(|| scope.set("counter", 0));

    // Assert
    assert!(matches!(result, Err(SluiceError::DigestOverflow { .. })));
}
