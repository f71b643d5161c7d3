// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension methods creating bridges straight from a push source.

use sluice_bridge::{BridgeConfig, PushPullBridge};
use sluice_core::{PushSource, Result};

/// Extension trait for any [`PushSource`] to open a [`PushPullBridge`] on it.
pub trait PushSourceExt: PushSource {
    /// Opens a bridge with the default configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sluice::prelude::*;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice::Result<()> {
    /// let input = EventTarget::<String>::new();
    /// let keys = input.bridge("keyup")?;
    ///
    /// input.dispatch("keyup", "r".to_string());
    /// assert_eq!(keys.next().await?, "r");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns the source's error if the subscription is refused.
    fn bridge(&self, selector: &Self::Selector) -> Result<PushPullBridge<Self::Item>> {
        PushPullBridge::new(self, selector)
    }

    /// Opens a bridge with an explicit configuration.
    ///
    /// # Errors
    /// Returns the source's error if the subscription is refused.
    fn bridge_with(
        &self,
        selector: &Self::Selector,
        config: BridgeConfig,
    ) -> Result<PushPullBridge<Self::Item>> {
        PushPullBridge::with_config(self, selector, config)
    }
}

impl<S: PushSource + ?Sized> PushSourceExt for S {}
