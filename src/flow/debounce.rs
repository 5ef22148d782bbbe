use std::{future::Future, rc::Rc, time::Duration};

use futures::{channel::oneshot, future::LocalBoxFuture};

use crate::{outcome::Outcome, rc::MutRc};

struct DebounceState<A, T> {
  generation: u64,
  parked: Option<(A, oneshot::Sender<Outcome<T>>)>,
}

type WrappedFn<A, T> = Rc<dyn Fn(A) -> LocalBoxFuture<'static, T>>;

/// A trailing-edge debounce wrapper around an asynchronous operation.
///
/// Each call parks its arguments and restarts the delay timer; when the
/// timer finally elapses the wrapped function runs once with the latest
/// arguments. Superseded callers resolve with `Outcome::Canceled`.
///
/// Timer delivery runs on a spawned task, so a `LocalSet` must be running.
pub struct Debounced<A, T> {
  f: WrappedFn<A, T>,
  delay: Duration,
  state: MutRc<DebounceState<A, T>>,
}

impl<A, T> Clone for Debounced<A, T> {
  fn clone(&self) -> Self {
    Self {
      f: self.f.clone(),
      delay: self.delay,
      state: self.state.clone(),
    }
  }
}

/// Wrap `f` behind a trailing-edge debounce of `delay`.
pub fn debounced<A, T, F, Fut>(f: F, delay: Duration) -> Debounced<A, T>
where
  A: 'static,
  T: 'static,
  F: Fn(A) -> Fut + 'static,
  Fut: Future<Output = T> + 'static,
{
  Debounced {
    f: Rc::new(move |args| Box::pin(f(args))),
    delay,
    state: MutRc::own(DebounceState { generation: 0, parked: None }),
  }
}

impl<A: 'static, T: 'static> Debounced<A, T> {
  /// Park this call and (re)start the delay timer.
  pub fn call(&self, args: A) -> LocalBoxFuture<'static, Outcome<T>> {
    let (tx, rx) = oneshot::channel();
    let generation = {
      let mut state = self.state.rc_deref_mut();
      state.generation += 1;
      if let Some((_, superseded)) = state.parked.replace((args, tx)) {
        let _ = superseded.send(Outcome::Canceled);
      }
      state.generation
    };

    let this = self.clone();
    let delay = self.delay;
    tokio::task::spawn_local(async move {
      tokio::time::sleep(delay).await;
      if this.state.rc_deref().generation == generation {
        this.run_parked().await;
      }
    });

    Box::pin(async move { rx.await.unwrap_or(Outcome::Canceled) })
  }

  /// Whether a call is parked awaiting its timer.
  pub fn pending(&self) -> bool { self.state.rc_deref().parked.is_some() }

  /// Drop the parked call, if any, resolving it with `Outcome::Canceled`.
  pub fn clear(&self) {
    let mut state = self.state.rc_deref_mut();
    state.generation += 1;
    if let Some((_, tx)) = state.parked.take() {
      let _ = tx.send(Outcome::Canceled);
    }
  }

  /// Run the parked call immediately instead of waiting out the timer.
  pub async fn flush(&self) {
    self.state.rc_deref_mut().generation += 1;
    self.run_parked().await;
  }

  async fn run_parked(&self) {
    let parked = self.state.rc_deref_mut().parked.take();
    if let Some((args, tx)) = parked {
      let output = (self.f)(args).await;
      let _ = tx.send(Outcome::Value(output));
    }
  }
}
