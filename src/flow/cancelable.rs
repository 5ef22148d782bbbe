use std::{cell::Cell, future::Future, rc::Rc};

use futures::future::LocalBoxFuture;

use crate::outcome::Outcome;

type WrappedFn<A, T> = Rc<dyn Fn(A) -> LocalBoxFuture<'static, T>>;

/// A latest-wins cancellation wrapper around an asynchronous operation.
///
/// Each invocation bumps a generation token, superseding the calls still
/// in flight. The body itself is never interrupted; a superseded call
/// resolves with `Outcome::Canceled` once its body finishes.
/// [`cancel`](Cancelable::cancel) invalidates every outstanding
/// generation without starting a new one.
pub struct Cancelable<A, T> {
  f: WrappedFn<A, T>,
  epoch: Rc<Cell<u64>>,
}

impl<A, T> Clone for Cancelable<A, T> {
  fn clone(&self) -> Self {
    Self { f: self.f.clone(), epoch: self.epoch.clone() }
  }
}

/// Wrap `f` so in-flight results can be discarded with `cancel`.
pub fn cancelable<A, T, F, Fut>(f: F) -> Cancelable<A, T>
where
  A: 'static,
  T: 'static,
  F: Fn(A) -> Fut + 'static,
  Fut: Future<Output = T> + 'static,
{
  Cancelable {
    f: Rc::new(move |args| Box::pin(f(args))),
    epoch: Rc::new(Cell::new(0)),
  }
}

impl<A: 'static, T: 'static> Cancelable<A, T> {
  pub fn call(&self, args: A) -> LocalBoxFuture<'static, Outcome<T>> {
    let f = self.f.clone();
    let epoch = self.epoch.clone();
    epoch.set(epoch.get() + 1);
    let generation = epoch.get();
    Box::pin(async move {
      let output = f(args).await;
      if epoch.get() == generation {
        Outcome::Value(output)
      } else {
        Outcome::Canceled
      }
    })
  }

  /// Discard delivery of every call currently in flight.
  pub fn cancel(&self) {
    self.epoch.set(self.epoch.get() + 1);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, time::Duration};

  use super::*;

  #[tokio::test(start_paused = true)]
  async fn delivers_when_not_canceled() {
    let wrapped = cancelable(|v: i32| async move { v + 1 });
    assert_eq!(wrapped.call(1).await, Outcome::Value(2));
  }

  #[tokio::test(start_paused = true)]
  async fn newer_call_supersedes_older() {
    let wrapped = cancelable(|v: i32| async move {
      tokio::time::sleep(Duration::from_millis(10)).await;
      v
    });

    let stale = wrapped.call(1);
    let fresh = wrapped.call(2);
    let (r1, r2) = futures::join!(stale, fresh);
    assert_eq!(r1, Outcome::Canceled);
    assert_eq!(r2, Outcome::Value(2));
  }

  #[tokio::test(start_paused = true)]
  async fn cancel_discards_in_flight_only() {
    let runs = Rc::new(RefCell::new(vec![]));
    let c_runs = runs.clone();
    let wrapped = cancelable(move |v: i32| {
      let runs = c_runs.clone();
      async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        runs.borrow_mut().push(v);
        v
      }
    });

    let in_flight = wrapped.call(1);
    wrapped.cancel();
    assert_eq!(in_flight.await, Outcome::Canceled);
    // The body still ran to completion.
    assert_eq!(*runs.borrow(), vec![1]);

    // Later calls deliver normally.
    assert_eq!(wrapped.call(2).await, Outcome::Value(2));
  }
}
