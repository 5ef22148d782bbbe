use futures::future::{ready, FutureExt, LocalBoxFuture};

use crate::{
  emitter::EventEmitter,
  observer::Observer,
  subscription::Subscription,
};

/// The single internal event key a subject binds its emitter to.
const DATA_EVENT: &str = "data";

/// A multicast push source: values pushed with [`next`](Subject::next) are
/// delivered to every current subscriber in subscription order.
///
/// `next` is asynchronous and settles only after all subscriber callbacks
/// (including their async bodies) have run.
pub struct Subject<T> {
  emitter: EventEmitter<&'static str, T>,
}

impl<T> Clone for Subject<T> {
  #[inline]
  fn clone(&self) -> Self { Self { emitter: self.emitter.clone() } }
}

impl<T: Clone + 'static> Default for Subject<T> {
  fn default() -> Self { Self::new() }
}

impl<T: Clone + 'static> Subject<T> {
  pub fn new() -> Self { Self { emitter: EventEmitter::new() } }

  /// Push a value to all current subscribers; resolves after every
  /// subscriber callback has settled.
  pub async fn next(&self, data: T) {
    self.emitter.emit(&DATA_EVENT, data).await;
  }

  pub fn subscribe(&self, mut cb: impl FnMut(T) + 'static) -> Subscription {
    self.subscribe_async(move |value| {
      cb(value);
      ready(()).boxed_local()
    })
  }

  pub fn subscribe_async(
    &self,
    cb: impl FnMut(T) -> LocalBoxFuture<'static, ()> + 'static,
  ) -> Subscription {
    self.emitter.on(DATA_EVENT, cb)
  }

  /// Subscribe for a single delivery.
  pub fn once(&self, cb: impl FnOnce(T) + 'static) -> Subscription {
    self.emitter.once(DATA_EVENT, move |value| {
      cb(value);
      ready(()).boxed_local()
    })
  }

  pub fn unsubscribe_all(&self) { self.emitter.off_all(&DATA_EVENT); }

  pub fn listener_count(&self) -> usize {
    self.emitter.listener_count(&DATA_EVENT)
  }

  /// An observer view over this subject, enabling operator chaining. The
  /// view subscribes to the subject when its first listener attaches and
  /// unsubscribes on disposal.
  pub fn to_observer(&self) -> Observer<T> {
    let subject = self.clone();
    Observer::with_connector(move |child| {
      subject.subscribe_async(move |value| {
        let child = child.clone();
        Box::pin(async move { child.emit(value).await })
      })
    })
  }
}
