use std::{future::Future, rc::Rc};

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::rc::MutRc;

type SharedRun<T> = Shared<LocalBoxFuture<'static, T>>;
type WrappedFn<A, T> = Rc<dyn Fn(A) -> LocalBoxFuture<'static, T>>;

/// Runs the wrapped function at most once and hands every caller the same
/// memoized output until [`clear`](Singleshot::clear).
///
/// Calls made while the first run is still in flight share that run
/// instead of starting another.
pub struct Singleshot<A, T: Clone> {
  f: WrappedFn<A, T>,
  run: MutRc<Option<SharedRun<T>>>,
}

impl<A, T: Clone> Clone for Singleshot<A, T> {
  fn clone(&self) -> Self {
    Self { f: self.f.clone(), run: self.run.clone() }
  }
}

pub fn singleshot<A, T, F, Fut>(f: F) -> Singleshot<A, T>
where
  A: 'static,
  T: Clone + 'static,
  F: Fn(A) -> Fut + 'static,
  Fut: Future<Output = T> + 'static,
{
  Singleshot {
    f: Rc::new(move |args| Box::pin(f(args))),
    run: MutRc::own(None),
  }
}

impl<A: 'static, T: Clone + 'static> Singleshot<A, T> {
  /// Start the single run, or join the existing one. Arguments of calls
  /// after the first are discarded.
  pub fn call(&self, args: A) -> LocalBoxFuture<'static, T> {
    let run = {
      let mut slot = self.run.rc_deref_mut();
      slot.get_or_insert_with(|| (self.f)(args).shared()).clone()
    };
    Box::pin(run)
  }

  /// Whether a run has started and not been cleared since.
  pub fn ran(&self) -> bool { self.run.rc_deref().is_some() }

  /// Forget the memoized run; the next call starts a fresh one.
  pub fn clear(&self) {
    *self.run.rc_deref_mut() = None;
  }
}
