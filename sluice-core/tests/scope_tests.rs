// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use serde_json::{json, Value};
use sluice_core::{Handler, Phase, PushSource, Scope, SluiceError, DIGEST_TTL};
use std::sync::Arc;

fn recorder() -> (Arc<Mutex<Vec<Value>>>, Handler<Value>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let handler: Handler<Value> = {
        let seen = seen.clone();
        Arc::new(move |value: Value| seen.lock().push(value))
    };
    (seen, handler)
}

#[test]
fn test_watcher_fires_initially_then_only_on_change() -> anyhow::Result<()> {
    // Arrange
    let scope = Scope::new();
    let (seen, handler) = recorder();
    scope.watch("search", handler)?;

    // Act
    scope.digest()?;
    scope.apply(|| scope.set("search", "ru"))?;
    scope.apply(|| scope.set("search", "ru"))?;
    scope.apply(|| scope.set("search", "rust"))?;

    // Assert
    assert_eq!(*seen.lock(), vec![Value::Null, json!("ru"), json!("rust")]);
    Ok(())
}

#[test]
fn test_set_outside_cycle_is_seen_on_next_digest() -> anyhow::Result<()> {
    // Arrange
    let scope = Scope::new();
    let (seen, handler) = recorder();
    scope.watch("user.name", handler)?;

    // Act
    scope.set("user.name", "alice");
    let before_digest = seen.lock().len();
    scope.digest()?;

    // Assert
    assert_eq!(before_digest, 0);
    assert_eq!(*seen.lock(), vec![json!("alice")]);
    assert_eq!(scope.get("user"), json!({ "name": "alice" }));
    Ok(())
}

#[test]
fn test_phase_is_visible_inside_apply_and_cleared_after() -> anyhow::Result<()> {
    // Arrange
    let scope = Scope::new();
    let observed = Arc::new(Mutex::new(None));

    // Act
    scope.apply(|| *observed.lock() = scope.phase())?;

    // Assert
    assert_eq!(*observed.lock(), Some(Phase::Apply));
    assert_eq!(scope.phase(), None);
    assert!(!scope.cycle_active());
    Ok(())
}

#[test]
fn test_nested_apply_is_rejected() -> anyhow::Result<()> {
    // Arrange
    let scope = Scope::new();
    let nested = Arc::new(Mutex::new(None));

    // Act
    scope.apply(|| *nested.lock() = Some(scope.apply(|| {})))?;

    // Assert
    assert!(matches!(
        nested.lock().take(),
        Some(Err(SluiceError::CycleInProgress))
    ));
    Ok(())
}

#[test]
fn test_child_sees_root_cycle_and_is_digested_with_root() -> anyhow::Result<()> {
    // Arrange
    let root = Scope::new();
    let child = root.child();
    let (seen, handler) = recorder();
    child.watch("query", handler)?;
    let child_saw_cycle = Arc::new(Mutex::new(false));

    // Act
    root.apply(|| {
        *child_saw_cycle.lock() = child.cycle_active();
        child.set("query", "tokio");
    })?;

    // Assert
    assert!(*child_saw_cycle.lock());
    assert_eq!(child.phase(), None);
    assert_eq!(*seen.lock(), vec![json!("tokio")]);
    assert!(!child.is_root());
    assert!(child.root().is_root());
    Ok(())
}

#[test]
fn test_destroy_cascades_and_drops_watchers() -> anyhow::Result<()> {
    // Arrange
    let root = Scope::new();
    let child = root.child();
    let grandchild = child.child();
    let (_seen, handler) = recorder();
    grandchild.watch("x", handler)?;

    // Act
    child.destroy();

    // Assert
    assert!(child.is_destroyed());
    assert!(grandchild.is_destroyed());
    assert!(!root.is_destroyed());
    assert_eq!(grandchild.watcher_count(), 0);
    assert!(matches!(child.apply(|| {}), Err(SluiceError::ScopeDestroyed)));
    assert!(matches!(
        grandchild.watch("x", Arc::new(|_: Value| {})),
        Err(SluiceError::ScopeDestroyed)
    ));
    Ok(())
}

#[test]
fn test_digest_overflow_when_watchers_never_settle() -> anyhow::Result<()> {
    // Arrange
    let scope = Scope::new();
    scope.watch("counter", {
        let scope = scope.clone();
        Arc::new(move |value: Value| {
            scope.set("counter", value.as_u64().unwrap_or(0) + 1);
        })
    })?;

    // Act
    let result = scope.digest();

    // Assert
    assert!(matches!(
        result,
        Err(SluiceError::DigestOverflow { iterations }) if iterations == DIGEST_TTL
    ));
    assert_eq!(scope.phase(), None);
    Ok(())
}

#[test]
fn test_unsubscribe_removes_watcher() -> anyhow::Result<()> {
    // Arrange
    let scope = Scope::new();
    let (seen, handler) = recorder();
    let unsubscribe = scope.subscribe("search", handler)?;

    // Act
    unsubscribe.unsubscribe();
    scope.apply(|| scope.set("search", "ignored"))?;

    // Assert
    assert_eq!(scope.watcher_count(), 0);
    assert!(seen.lock().is_empty());
    Ok(())
}
