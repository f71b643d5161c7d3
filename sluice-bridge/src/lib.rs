// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Push-to-pull bridging for callback-style sources.
//!
//! A [`PushPullBridge`] subscribes to a [`PushSource`](sluice_core::PushSource)
//! once and lets a consumer pull the values it pushes, one awaited
//! [`next`](PushPullBridge::next) at a time or as a [`Stream`](futures::Stream).
//!
//! # Delivery
//!
//! | push arrives while... | outcome |
//! |---|---|
//! | a pull is pending | the most recently issued pull resolves with it |
//! | no pull is pending | it is buffered; the next pull takes the newest buffered value |
//! | the bridge is closed | it is ignored |
//!
//! LIFO is the default. [`BridgeConfig`] switches to FIFO, bounds the buffer,
//! and picks what happens to pulls still pending at close.
//!
//! # Consuming
//!
//! [`ConsumeExt::consume`] runs an async handler per pulled value until the
//! handler breaks, fails, or a cancellation token fires. The bridge is dropped,
//! and therefore unsubscribed, on every exit.

mod logging;
mod slots;

pub mod bridge;
pub mod config;
pub mod consume;
pub mod next;
pub mod sources;

pub use self::bridge::{BridgeState, PushPullBridge};
pub use self::config::{BridgeConfig, BufferPolicy, ClosePolicy, DeliveryOrder};
pub use self::consume::ConsumeExt;
pub use self::next::Next;
pub use self::sources::{from_event, observe_on_scope};
