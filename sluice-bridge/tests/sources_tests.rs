// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::FutureExt;
use serde_json::{json, Value};
use sluice_bridge::{from_event, observe_on_scope};
use sluice_core::{EventTarget, Scope, SluiceError};
use sluice_test_utils::test_data::{click_a, click_b, click_c, click_d, ClickEvent};

#[tokio::test]
async fn test_from_event_pulls_clicks_newest_first_then_waits() -> anyhow::Result<()> {
    // Arrange
    let button = EventTarget::<ClickEvent>::new();
    let clicks = from_event(&button, "click")?;

    // Act
    for click in [click_a(), click_b(), click_c()] {
        button.dispatch("click", click);
    }

    // Assert
    assert_eq!(clicks.next().await?, click_c());
    assert_eq!(clicks.next().await?, click_b());
    assert_eq!(clicks.next().await?, click_a());

    let pending = clicks.next();
    button.dispatch("click", click_d());
    assert_eq!(pending.await?, click_d());

    Ok(())
}

#[tokio::test]
async fn test_from_event_ignores_other_event_names() -> anyhow::Result<()> {
    // Arrange
    let button = EventTarget::<ClickEvent>::new();
    let clicks = from_event(&button, "click")?;

    // Act
    button.dispatch("dblclick", click_a());

    // Assert
    assert_eq!(clicks.buffered(), 0);
    assert_eq!(button.listener_count("click"), 1);

    Ok(())
}

#[tokio::test]
async fn test_from_event_removes_listener_on_drop() -> anyhow::Result<()> {
    // Arrange
    let button = EventTarget::<ClickEvent>::new();
    let clicks = from_event(&button, "click")?;

    // Act
    drop(clicks);

    // Assert
    assert_eq!(button.listener_count("click"), 0);

    Ok(())
}

#[tokio::test]
async fn test_observe_on_scope_delivers_initial_and_changed_values() -> anyhow::Result<()> {
    // Arrange
    let scope = Scope::new();
    let search = observe_on_scope(&scope, "search")?;

    // Act
    scope.digest()?;
    scope.apply(|| scope.set("search", "ru"))?;
    scope.apply(|| scope.set("search", "rust"))?;

    // Assert
    assert_eq!(search.next().await?, json!("rust"));
    assert_eq!(search.next().await?, json!("ru"));
    assert_eq!(search.next().await?, Value::Null);
    assert!(search.next().now_or_never().is_none());

    Ok(())
}

#[tokio::test]
async fn test_observe_on_scope_unwatches_on_close() -> anyhow::Result<()> {
    // Arrange
    let scope = Scope::new();
    let mut search = observe_on_scope(&scope, "search")?;
    assert_eq!(scope.watcher_count(), 1);

    // Act
    search.close();

    // Assert
    assert_eq!(scope.watcher_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_observe_on_destroyed_scope_fails() {
    // Arrange
    let scope = Scope::new();
    scope.destroy();

    // Act
    let result = observe_on_scope(&scope, "search");

    // Assert
    assert!(matches!(result, Err(SluiceError::ScopeDestroyed)));
}

#[tokio::test]
async fn test_from_event_without_a_name_is_refused() -> anyhow::Result<()> {
    // Arrange
    let target = EventTarget::<ClickEvent>::new();

    // Act
    let result = from_event(&target, "");

    // Assert
    assert!(matches!(result, Err(SluiceError::SubscriptionError { .. })));
    assert_eq!(target.listener_count(""), 0);

    Ok(())
}
