use futures::{channel::mpsc, StreamExt};

use crate::{observer::Observer, subscription::Subscription};

/// Push handle passed to a producer callback. Values fed in are delivered
/// to the observer's listeners in feed order by a single worker task.
pub struct Feed<T> {
  tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for Feed<T> {
  fn clone(&self) -> Self { Self { tx: self.tx.clone() } }
}

impl<T> Feed<T> {
  /// Push a value. Returns `false` once the source is torn down.
  pub fn next(&self, value: T) -> bool {
    self.tx.unbounded_send(value).is_ok()
  }
}

fn spawn_feed_worker<T: Clone + 'static>(
  observer: Observer<T>,
) -> mpsc::UnboundedSender<T> {
  let (tx, mut rx) = mpsc::unbounded();
  tokio::task::spawn_local(async move {
    while let Some(value) = rx.next().await {
      observer.emit(value).await;
    }
  });
  tx
}

/// A cold source: `producer` runs when the first listener attaches,
/// receives a [`Feed`] to push through, and returns a teardown invoked on
/// disposal.
///
/// Requires a running `LocalSet` at subscribe time.
pub fn create_cold<T: Clone + 'static>(
  producer: impl FnOnce(Feed<T>) -> Subscription + 'static,
) -> Observer<T> {
  Observer::with_connector(move |child| {
    let tx = spawn_feed_worker(child);
    producer(Feed { tx })
  })
}

/// Alias for [`create_cold`].
pub fn create<T: Clone + 'static>(
  producer: impl FnOnce(Feed<T>) -> Subscription + 'static,
) -> Observer<T> {
  create_cold(producer)
}

/// A hot source: `producer` runs immediately, independent of subscriber
/// count; values pushed while nobody listens are dropped. The returned
/// observer is shared, so it never auto-disposes; stopping the producer and
/// running its cleanup is explicit via [`Observer::dispose`].
///
/// Requires a running `LocalSet` at creation time.
pub fn create_hot<T: Clone + 'static>(
  producer: impl FnOnce(Feed<T>) -> Subscription + 'static,
) -> Observer<T> {
  let observer = Observer::new().share();
  let tx = spawn_feed_worker(observer.clone());
  let teardown = producer(Feed { tx });
  observer.set_teardown(teardown);
  observer
}
