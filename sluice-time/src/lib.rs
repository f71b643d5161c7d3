// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Leading-edge rate gating.
//!
//! - [`RateGate`]: a standalone gate a pull loop checks with
//!   [`try_pass`](RateGate::try_pass) before acting on a value
//! - [`RateGateExt`]: the same gate applied as a stream operator
//!
//! The clock is abstracted behind [`Timer`]. With the `runtime-tokio` feature
//! (default) [`TokioTimer`] is provided and `RateGate::new` uses it.

mod logging;

pub mod rate_gate;
pub mod rate_gated;
pub mod runtimes;
pub mod timer;

pub use self::rate_gate::RateGate;
pub use self::rate_gated::RateGateExt;
pub use self::timer::Timer;

#[cfg(feature = "runtime-tokio")]
pub use self::runtimes::tokio::TokioTimer;
