use std::{cell::Cell, future::Future, rc::Rc};

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::rc::MutRc;

/// Observable lifecycle of a [`Singlerun`]'s underlying task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
  /// No run started since creation or the last `clear`.
  Ready,
  /// The single run is in flight.
  Pending,
  /// The run settled with `Ok`.
  Fulfilled,
  /// The run settled with `Err`.
  Rejected,
}

type SharedRun<T, E> = Shared<LocalBoxFuture<'static, Result<T, E>>>;
type WrappedFn<A, T, E> =
  Rc<dyn Fn(A) -> LocalBoxFuture<'static, Result<T, E>>>;

/// Like [`Singleshot`](crate::flow::Singleshot) for fallible operations,
/// additionally exposing the run's lifecycle through
/// [`status`](Singlerun::status).
pub struct Singlerun<A, T: Clone, E: Clone> {
  f: WrappedFn<A, T, E>,
  run: MutRc<Option<SharedRun<T, E>>>,
  status: Rc<Cell<RunStatus>>,
}

impl<A, T: Clone, E: Clone> Clone for Singlerun<A, T, E> {
  fn clone(&self) -> Self {
    Self {
      f: self.f.clone(),
      run: self.run.clone(),
      status: self.status.clone(),
    }
  }
}

pub fn singlerun<A, T, E, F, Fut>(f: F) -> Singlerun<A, T, E>
where
  A: 'static,
  T: Clone + 'static,
  E: Clone + 'static,
  F: Fn(A) -> Fut + 'static,
  Fut: Future<Output = Result<T, E>> + 'static,
{
  Singlerun {
    f: Rc::new(move |args| Box::pin(f(args))),
    run: MutRc::own(None),
    status: Rc::new(Cell::new(RunStatus::Ready)),
  }
}

impl<A: 'static, T: Clone + 'static, E: Clone + 'static> Singlerun<A, T, E> {
  /// Start the single run, or join the existing one.
  pub fn call(&self, args: A) -> LocalBoxFuture<'static, Result<T, E>> {
    let run = {
      let mut slot = self.run.rc_deref_mut();
      slot
        .get_or_insert_with(|| {
          self.status.set(RunStatus::Pending);
          let status = self.status.clone();
          let body = (self.f)(args);
          let fut: LocalBoxFuture<'static, Result<T, E>> =
            Box::pin(async move {
              let result = body.await;
              status.set(match result {
                Ok(_) => RunStatus::Fulfilled,
                Err(_) => RunStatus::Rejected,
              });
              result
            });
          fut.shared()
        })
        .clone()
    };
    Box::pin(run)
  }

  pub fn status(&self) -> RunStatus { self.status.get() }

  /// Forget the run and return to `Ready`.
  pub fn clear(&self) {
    *self.run.rc_deref_mut() = None;
    self.status.set(RunStatus::Ready);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, time::Duration};

  use super::*;

  #[tokio::test(start_paused = true)]
  async fn status_tracks_the_run_lifecycle() {
    let run = singlerun(|v: i32| async move {
      tokio::time::sleep(Duration::from_millis(5)).await;
      Ok::<_, &str>(v)
    });

    assert_eq!(run.status(), RunStatus::Ready);
    let pending = run.call(1);
    assert_eq!(run.status(), RunStatus::Pending);
    assert_eq!(pending.await, Ok(1));
    assert_eq!(run.status(), RunStatus::Fulfilled);
  }

  #[tokio::test]
  async fn rejection_is_memoized_until_clear() {
    let runs = Rc::new(RefCell::new(0));
    let c_runs = runs.clone();
    let run = singlerun(move |_: ()| {
      let runs = c_runs.clone();
      async move {
        *runs.borrow_mut() += 1;
        Err::<i32, _>("boom")
      }
    });

    assert_eq!(run.call(()).await, Err("boom"));
    assert_eq!(run.status(), RunStatus::Rejected);
    // The failure is replayed, not re-run.
    assert_eq!(run.call(()).await, Err("boom"));
    assert_eq!(*runs.borrow(), 1);

    run.clear();
    assert_eq!(run.status(), RunStatus::Ready);
    assert_eq!(run.call(()).await, Err("boom"));
    assert_eq!(*runs.borrow(), 2);
  }
}
