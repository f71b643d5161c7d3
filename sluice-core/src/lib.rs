// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core capabilities for bridging push sources into pull sequences.
//!
//! - [`PushSource`]: register a [`Handler`], get back an [`Unsubscribe`]
//! - [`EventTarget`]: named events with DOM-style listeners
//! - [`Scope`]: a watchable model with apply/digest update cycles
//! - [`SafeApply`]: effects guarded by an [`EffectContext`]'s liveness
//! - [`CancellationToken`]: cooperative stop signal for consumer loops

mod logging;

pub mod cancellation_token;
pub mod event_target;
pub mod guarded_effect;
pub mod push_source;
pub mod scope;

pub use self::cancellation_token::{CancellationToken, Cancelled};
pub use self::event_target::{EventTarget, ListenerId};
pub use self::guarded_effect::{EffectContext, SafeApply};
pub use self::push_source::{source_fn, FnSource, Handler, PushSource, Unsubscribe};
pub use self::scope::{Phase, Scope, WatchId, DIGEST_TTL};
pub use sluice_error::{IntoSluiceError, Result, SluiceError};
