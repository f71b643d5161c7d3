// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the sluice workspace.
//!
//! Designed for development and testing only, not for production code.
//!
//! # Key Types
//!
//! ## `RecordingSource<T>`
//!
//! A push source whose emissions are driven by the test, and which records how
//! it was subscribed to and torn down:
//!
//! ```rust
//! use sluice_core::PushSource;
//! use sluice_test_utils::RecordingSource;
//! use std::sync::Arc;
//!
//! let source = RecordingSource::<u32>::new();
//! let unsubscribe = source.subscribe("click", Arc::new(|_: u32| {})).unwrap();
//! assert_eq!(source.emit(1), 1);
//!
//! unsubscribe.unsubscribe();
//! assert_eq!(source.unsubscribe_calls(), 1);
//! assert_eq!(source.emit(2), 0);
//! ```
//!
//! `RecordingSource::ignoring_unsubscribe()` keeps delivering after teardown,
//! for checking that consumers stop reacting on their own.
//!
//! ## `MockContext`
//!
//! An `EffectContext` with switchable liveness and cycle state that counts the
//! cycles it was asked to start.
//!
//! ## Fixtures
//!
//! - `ClickEvent` - `click_a()` .. `click_d()`
//! - `User` - `user_alice()`, `user_bob()`, `user_charlie()`
//!
//! # Module Organization
//!
//! - `recording_source` - `RecordingSource<T>`
//! - `mock_context` - `MockContext`
//! - `test_data` - event and user fixtures
//! - `helpers` - async assertion helpers

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod helpers;
pub mod mock_context;
pub mod recording_source;
pub mod test_data;

pub use helpers::{assert_no_element_emitted, assert_pending};
pub use mock_context::MockContext;
pub use recording_source::RecordingSource;
pub use test_data::{ClickEvent, User};
