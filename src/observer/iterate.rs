//! Bridges from the push model to pull-style consumption: `to_promise` for
//! a single value, `to_iterator_context` for a stream of them.

use std::{
  pin::Pin,
  task::{Context, Poll},
};

use futures::{
  channel::{mpsc, oneshot},
  Future, Stream,
};
use pin_project_lite::pin_project;
use smallvec::SmallVec;

use crate::{
  outcome::Outcome,
  rc::MutRc,
  subscription::{Subscription, SubscriptionLike, SubscriptionGuard},
};

use super::Observer;

pin_project! {
  /// Future returned by [`Observer::to_promise`]. Resolves with the next
  /// emitted value, or `Outcome::Canceled` if the source goes away first.
  pub struct NextValue<T> {
    #[pin]
    rx: oneshot::Receiver<T>,
    guard: SubscriptionGuard,
  }
}

impl<T> Future for NextValue<T> {
  type Output = Outcome<T>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    match self.project().rx.poll(cx) {
      Poll::Ready(Ok(value)) => Poll::Ready(Outcome::Value(value)),
      Poll::Ready(Err(_)) => Poll::Ready(Outcome::Canceled),
      Poll::Pending => Poll::Pending,
    }
  }
}

pin_project! {
  /// Stream returned by [`IteratorContext::iterate`]. Ends when `done` is
  /// called on its context or when the iteration handle is dropped.
  pub struct Iterate<T> {
    #[pin]
    rx: mpsc::UnboundedReceiver<T>,
    guard: SubscriptionGuard,
  }
}

impl<T> Stream for Iterate<T> {
  type Item = T;

  fn poll_next(
    self: Pin<&mut Self>,
    cx: &mut Context<'_>,
  ) -> Poll<Option<T>> {
    self.project().rx.poll_next(cx)
  }
}

struct IterState {
  done: bool,
  subs: SmallVec<[Subscription; 1]>,
}

/// Pull bridge over an observer.
///
/// Each `iterate()` call lazily opens an independent subscription and yields
/// values as they arrive, finite or infinite. `done()` forcibly ends every
/// open iteration and releases the underlying subscriptions.
pub struct IteratorContext<T> {
  source: Observer<T>,
  state: MutRc<IterState>,
}

impl<T> Clone for IteratorContext<T> {
  fn clone(&self) -> Self {
    Self { source: self.source.clone(), state: self.state.clone() }
  }
}

impl<T: Clone + 'static> IteratorContext<T> {
  pub(crate) fn new(source: Observer<T>) -> Self {
    Self {
      source,
      state: MutRc::own(IterState { done: false, subs: SmallVec::new() }),
    }
  }

  /// Open a fresh iteration over values arriving from now on.
  pub fn iterate(&self) -> Iterate<T> {
    let (tx, rx) = mpsc::unbounded();
    if self.state.rc_deref().done {
      // Ended context: yields an already-terminated stream.
      return Iterate { rx, guard: SubscriptionGuard(Subscription::empty()) };
    }
    let sub = self.source.connect(move |value| {
      let _ = tx.unbounded_send(value);
    });
    self.state.rc_deref_mut().subs.push(sub.clone());
    Iterate { rx, guard: SubscriptionGuard(sub) }
  }

  /// Forcibly end all iterations and release the subscriptions.
  pub fn done(&self) {
    let subs = {
      let mut state = self.state.rc_deref_mut();
      state.done = true;
      std::mem::take(&mut state.subs)
    };
    for mut sub in subs {
      sub.unsubscribe();
    }
  }
}

impl<T: Clone + 'static> Observer<T> {
  /// Resolve with the next emitted value.
  pub fn to_promise(&self) -> NextValue<T> {
    let (tx, rx) = oneshot::channel();
    let tx = MutRc::own(Some(tx));
    let sub = self.once(move |value| {
      if let Some(tx) = tx.rc_deref_mut().take() {
        let _ = tx.send(value);
      }
    });
    NextValue { rx, guard: SubscriptionGuard(sub) }
  }

  /// Bridge this observer to pull-style iteration.
  pub fn to_iterator_context(&self) -> IteratorContext<T> {
    IteratorContext::new(self.clone())
  }
}

#[cfg(test)]
mod tests {
  use futures::{executor::block_on, StreamExt};

  use super::*;
  use crate::subject::Subject;

  #[test]
  fn to_promise_resolves_with_next_value() {
    block_on(async {
      let subject = Subject::new();
      let next = subject.to_observer().to_promise();
      subject.next(42).await;
      assert_eq!(next.await, Outcome::Value(42));
    });
  }

  #[test]
  fn to_promise_drop_releases_listener() {
    let subject = Subject::<i32>::new();
    let observer = subject.to_observer().share();
    let next = observer.to_promise();
    assert_eq!(observer.listener_count(), 1);
    drop(next);
    assert_eq!(observer.listener_count(), 0);
  }

  #[test]
  fn iterate_yields_values_until_done() {
    block_on(async {
      let subject = Subject::new();
      let context = subject.to_observer().to_iterator_context();
      let mut iteration = context.iterate();

      subject.next(1).await;
      subject.next(2).await;
      assert_eq!(iteration.next().await, Some(1));
      assert_eq!(iteration.next().await, Some(2));

      context.done();
      subject.next(3).await;
      assert_eq!(iteration.next().await, None);
    });
  }

  #[test]
  fn iterations_are_independent_and_restartable() {
    block_on(async {
      let subject = Subject::new();
      let context = subject.to_observer().share().to_iterator_context();

      let mut first = context.iterate();
      subject.next(1).await;
      assert_eq!(first.next().await, Some(1));
      drop(first);

      let mut second = context.iterate();
      subject.next(2).await;
      assert_eq!(second.next().await, Some(2));
    });
  }
}
