// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::{debug, warn_log};
use core::future::Future;
use core::ops::ControlFlow;
use futures::future::{select, Either};
use futures::pin_mut;
use futures::stream::{Stream, StreamExt};
use sluice_core::{CancellationToken, Result, SluiceError};

/// Extension trait driving a pull loop over a stream with an async handler.
pub trait ConsumeExt<T>: Stream<Item = T> + Sized {
    /// Pulls items one at a time and awaits `on_next` for each before pulling again.
    ///
    /// The loop ends when:
    /// - the stream ends,
    /// - `on_next` returns `Ok(ControlFlow::Break(()))`,
    /// - `on_next` returns an error, which is returned as [`SluiceError::UserError`],
    /// - `cancellation_token` is cancelled, checked while waiting for the next item.
    ///
    /// The stream is dropped on every exit path. For a
    /// [`PushPullBridge`](crate::PushPullBridge) that releases the subscription.
    ///
    /// # Example
    ///
    /// ```
    /// use core::ops::ControlFlow;
    /// use sluice_bridge::{ConsumeExt, PushPullBridge};
    /// use sluice_core::EventTarget;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let button = EventTarget::<u32>::new();
    /// let clicks = PushPullBridge::new(&button, "click")?;
    /// button.dispatch("click", 1);
    ///
    /// clicks
    ///     .consume(
    ///         |value| async move {
    ///             assert_eq!(value, 1);
    ///             Ok::<_, std::io::Error>(ControlFlow::Break(()))
    ///         },
    ///         None,
    ///     )
    ///     .await?;
    ///
    /// assert_eq!(button.listener_count("click"), 0);
    /// # Ok(())
    /// # }
    /// ```
    fn consume<F, Fut, E>(
        self,
        on_next: F,
        cancellation_token: Option<CancellationToken>,
    ) -> impl Future<Output = Result<()>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = core::result::Result<ControlFlow<()>, E>>,
        E: std::error::Error + Send + Sync + 'static;
}

impl<S, T> ConsumeExt<T> for S
where
    S: Stream<Item = T> + Unpin,
{
    fn consume<F, Fut, E>(
        self,
        on_next: F,
        cancellation_token: Option<CancellationToken>,
    ) -> impl Future<Output = Result<()>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = core::result::Result<ControlFlow<()>, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        consume_impl(self, on_next, cancellation_token)
    }
}

async fn consume_impl<S, T, F, Fut, E>(
    mut stream: S,
    mut on_next: F,
    cancellation_token: Option<CancellationToken>,
) -> Result<()>
where
    S: Stream<Item = T> + Unpin,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = core::result::Result<ControlFlow<()>, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let cancellation_token = cancellation_token.unwrap_or_default();

    loop {
        let item = {
            let cancelled = cancellation_token.cancelled();
            pin_mut!(cancelled);
            match select(cancelled, stream.next()).await {
                Either::Left(((), _)) => {
                    debug!("consume loop cancelled");
                    return Ok(());
                }
                Either::Right((item, _)) => item,
            }
        };

        let Some(item) = item else {
            debug!("consume loop finished: stream ended");
            return Ok(());
        };

        match on_next(item).await {
            Ok(ControlFlow::Continue(())) => {}
            Ok(ControlFlow::Break(())) => {
                debug!("consume loop stopped by handler");
                return Ok(());
            }
            Err(error) => {
                warn_log!("consume loop aborted by handler error: {}", error);
                return Err(SluiceError::user_error(error));
            }
        }
    }
}
