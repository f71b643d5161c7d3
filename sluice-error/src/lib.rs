// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the sluice push-to-pull bridge
//!
//! A single root [`SluiceError`] covers the bridge lifecycle, push source
//! subscription, update-cycle contexts and errors raised by user handlers.
//!
//! # Examples
//!
//! ```
//! use sluice_error::{Result, SluiceError};
//!
//! fn pull() -> Result<u32> {
//!     Err(SluiceError::BridgeClosed)
//! }
//!
//! assert!(pull().unwrap_err().is_permanent());
//! ```

/// Root error type for all sluice operations
#[derive(Debug, thiserror::Error)]
pub enum SluiceError {
    /// The bridge has been closed
    ///
    /// Returned by pulls made after close, and by pulls still pending at close
    /// time when the bridge rejects them instead of abandoning them.
    #[error("Bridge is closed")]
    BridgeClosed,

    /// A push source refused the subscription
    #[error("Subscription error: {context}")]
    SubscriptionError {
        /// Details about the subscription failure
        context: String,
    },

    /// The context has been destroyed
    #[error("Scope is destroyed")]
    ScopeDestroyed,

    /// An update cycle was requested while another one is running
    #[error("Update cycle already in progress")]
    CycleInProgress,

    /// Watchers kept changing the model and the digest never settled
    #[error("Digest did not settle after {iterations} iterations")]
    DigestOverflow {
        /// Number of dirty passes performed before giving up
        iterations: usize,
    },

    /// Custom error from user code
    ///
    /// Wraps errors produced by consumer handlers so that they surface from
    /// the consumer loop as a single error type.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SluiceError {
    /// Create a subscription error with the given context
    pub fn subscription_error(context: impl Into<String>) -> Self {
        Self::SubscriptionError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Check if this is a recoverable error
    ///
    /// A busy update cycle clears once the running cycle ends, so the same
    /// request may succeed later.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::CycleInProgress)
    }

    /// Check if this error indicates a permanent failure
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::BridgeClosed | Self::ScopeDestroyed | Self::DigestOverflow { .. }
        )
    }
}

/// Specialized Result type for sluice operations
///
/// ```
/// use sluice_error::Result;
///
/// fn process() -> Result<String> {
///     Ok("processed".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, SluiceError>;

/// Extension trait for converting errors into `SluiceError`
///
/// Automatically implemented for all types that implement
/// `std::error::Error + Send + Sync + 'static`.
pub trait IntoSluiceError {
    /// Convert this error into a `SluiceError`
    fn into_sluice(self) -> SluiceError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoSluiceError for E {
    fn into_sluice(self) -> SluiceError {
        SluiceError::user_error(self)
    }
}
