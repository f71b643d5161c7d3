// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Turn callback-driven event sources into values you pull.
//!
//! A UI button, a watched model field, or any other source that calls you back
//! is wrapped in a [`PushPullBridge`]; the consumer then awaits one value at a
//! time, or treats the bridge as a `Stream`. Two small companions cover what a
//! pull loop usually needs next:
//!
//! - [`RateGate`]: act on the first value, then ignore values for a cooldown
//! - [`SafeApply`]: apply a result to a context only while it is still alive
//!
//! # Example
//!
//! ```rust
//! use sluice::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> sluice::Result<()> {
//! let scope = Scope::new();
//! let search = observe_on_scope(&scope, "search")?;
//! let mut gate = RateGate::new(Duration::from_secs(1));
//!
//! scope.apply(|| scope.set("search", "rust"))?;
//!
//! let term = search.next().await?;
//! let term = term.as_str().unwrap_or_default().to_owned();
//! if gate.try_pass() {
//!     let applied = scope.safe_apply(|| scope.set("data", format!("results for {term}")))?;
//!     assert!(applied);
//! }
//! assert_eq!(scope.get("data"), "results for rust");
//! # Ok(())
//! # }
//! ```
//!
//! # Crates
//!
//! | crate | contents |
//! |---|---|
//! | `sluice-core` | `PushSource`, `EventTarget`, `Scope`, `SafeApply`, `CancellationToken` |
//! | `sluice-bridge` | `PushPullBridge`, `BridgeConfig`, `ConsumeExt` |
//! | `sluice-time` | `RateGate`, `RateGateExt` |
//! | `sluice-error` | `SluiceError` |

pub mod source_ext;

pub use sluice_bridge::{
    from_event, observe_on_scope, BridgeConfig, BridgeState, BufferPolicy, ClosePolicy,
    ConsumeExt, DeliveryOrder, Next, PushPullBridge,
};
pub use sluice_core::{
    source_fn, CancellationToken, EffectContext, EventTarget, Handler, PushSource, Result,
    SafeApply, Scope, SluiceError, Unsubscribe, DIGEST_TTL,
};
pub use sluice_time::{RateGate, RateGateExt, Timer};

#[cfg(feature = "runtime-tokio")]
pub use sluice_time::TokioTimer;

pub use self::source_ext::PushSourceExt;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::source_ext::PushSourceExt;
    pub use sluice_bridge::{from_event, observe_on_scope, ConsumeExt, PushPullBridge};
    pub use sluice_core::{
        EffectContext, EventTarget, PushSource, SafeApply, Scope, SluiceError,
    };
    pub use sluice_time::{RateGate, RateGateExt};
}
