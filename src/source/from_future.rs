use std::future::Future;

use crate::{observer::Observer, subscription::Subscription};

/// A single-emission source: resolves the future on first subscribe and
/// emits its output.
///
/// Requires a running `LocalSet` at subscribe time.
pub fn from_future<F>(fut: F) -> Observer<F::Output>
where
  F: Future + 'static,
  F::Output: Clone,
{
  Observer::with_connector(move |child| {
    tokio::task::spawn_local(async move {
      let value = fut.await;
      child.emit(value).await;
    });
    Subscription::empty()
  })
}

/// Like [`from_future`] for fallible futures: an `Err` is routed to
/// `fallback` and suppressed instead of terminating the stream.
pub fn from_future_or<F, T, E>(
  fut: F,
  fallback: impl FnOnce(E) + 'static,
) -> Observer<T>
where
  F: Future<Output = Result<T, E>> + 'static,
  T: Clone + 'static,
  E: 'static,
{
  Observer::with_connector(move |child| {
    tokio::task::spawn_local(async move {
      match fut.await {
        Ok(value) => child.emit(value).await,
        Err(err) => fallback(err),
      }
    });
    Subscription::empty()
  })
}
