// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sluice_time::{RateGate, Timer, TokioTimer};
use std::time::Duration;
use tokio::time::{advance, pause};

#[tokio::test]
async fn test_first_call_passes_then_window_closes() {
    // Arrange
    pause();
    let mut gate = RateGate::new(Duration::from_millis(1000));

    // Act & Assert
    assert!(gate.try_pass());
    assert!(!gate.try_pass());

    advance(Duration::from_millis(999)).await;
    assert!(!gate.try_pass());

    advance(Duration::from_millis(1)).await;
    assert!(gate.try_pass());
}

#[tokio::test]
async fn test_window_restarts_from_last_pass_not_last_call() {
    // Arrange
    pause();
    let mut gate = RateGate::new(Duration::from_millis(100));
    assert!(gate.try_pass());

    // Act
    advance(Duration::from_millis(60)).await;
    let during_window = gate.try_pass();
    advance(Duration::from_millis(40)).await;
    let at_window_end = gate.try_pass();

    // Assert
    assert!(!during_window);
    assert!(at_window_end);
    assert_eq!(gate.remaining(), Duration::from_millis(100));
}

#[tokio::test]
async fn test_gate_on_explicit_timer() {
    // Arrange
    pause();
    let timer = TokioTimer;
    let started = timer.now();
    let mut gate = RateGate::with_timer(Duration::from_secs(1), timer);

    // Act
    assert!(gate.try_pass());
    advance(Duration::from_millis(250)).await;

    // Assert
    assert_eq!(timer.now() - started, Duration::from_millis(250));
    assert_eq!(gate.remaining(), Duration::from_millis(750));
    assert!(!gate.is_open());
}

#[tokio::test]
async fn test_independent_gates_do_not_share_state() {
    // Arrange
    pause();
    let mut first = RateGate::new(Duration::from_secs(1));
    let mut second = RateGate::new(Duration::from_secs(1));

    // Act
    assert!(first.try_pass());

    // Assert
    assert!(second.try_pass());
    assert!(!first.try_pass());
    assert!(!second.try_pass());
}

#[tokio::test]
async fn test_unbounded_delay_passes_once_without_panicking() {
    // Arrange
    pause();
    let mut gate = RateGate::new(Duration::MAX);

    // Act & Assert
    assert!(gate.try_pass());
    advance(Duration::from_secs(3600)).await;
    assert!(!gate.try_pass());
    assert_eq!(gate.remaining(), Duration::MAX);
}
