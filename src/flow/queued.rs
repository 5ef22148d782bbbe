use std::{collections::VecDeque, future::Future, rc::Rc};

use futures::{
  channel::oneshot,
  future::LocalBoxFuture,
};

use crate::{outcome::Outcome, rc::MutRc};

enum Turn {
  Run,
  Cancel,
}

struct QueueState {
  busy: bool,
  epoch: u64,
  pending: VecDeque<oneshot::Sender<Turn>>,
}

type WrappedFn<A, T> = Rc<dyn Fn(A) -> LocalBoxFuture<'static, T>>;

/// Owns the execution turn while `held`. Dropping a call future that holds
/// the turn hands it to the next pending entry instead of stalling the
/// queue.
struct TurnGuard {
  state: MutRc<QueueState>,
  held: bool,
}

impl TurnGuard {
  fn new(state: MutRc<QueueState>, held: bool) -> Self {
    Self { state, held }
  }
}

impl Drop for TurnGuard {
  fn drop(&mut self) {
    if !self.held {
      return;
    }
    let mut state = self.state.rc_deref_mut();
    // Hand the turn to the next queued entry, skipping dropped waiters.
    loop {
      match state.pending.pop_front() {
        Some(tx) => {
          if tx.send(Turn::Run).is_ok() {
            break;
          }
        }
        None => {
          state.busy = false;
          break;
        }
      }
    }
  }
}

/// Serialized execution wrapper around an asynchronous operation.
///
/// Concurrent calls execute strictly one at a time, in submission order
/// (submission happens when [`call`](Queued::call) returns, not when the
/// returned future is first polled). A body's failure is its own output's
/// business — encode it in `T` — and never halts subsequent entries.
///
/// Dropping a call future releases its turn: a call dropped before running
/// simply never runs, and the queue moves on to the next entry.
pub struct Queued<A, T> {
  f: WrappedFn<A, T>,
  state: MutRc<QueueState>,
}

impl<A, T> Clone for Queued<A, T> {
  fn clone(&self) -> Self {
    Self { f: self.f.clone(), state: self.state.clone() }
  }
}

/// Wrap `f` so concurrent invocations run one at a time, FIFO.
pub fn queued<A, T, F, Fut>(f: F) -> Queued<A, T>
where
  A: 'static,
  T: 'static,
  F: Fn(A) -> Fut + 'static,
  Fut: Future<Output = T> + 'static,
{
  Queued {
    f: Rc::new(move |args| Box::pin(f(args))),
    state: MutRc::own(QueueState {
      busy: false,
      epoch: 0,
      pending: VecDeque::new(),
    }),
  }
}

impl<A: 'static, T: 'static> Queued<A, T> {
  /// Invoke the wrapped function once the queue reaches this call.
  ///
  /// Resolves with `Outcome::Value` of the body's output, or
  /// `Outcome::Canceled` if the entry was dropped by [`clear`](Self::clear)
  /// before starting (or superseded by [`cancel`](Self::cancel) while in
  /// flight).
  pub fn call(&self, args: A) -> LocalBoxFuture<'static, Outcome<T>> {
    // Take or queue for the execution turn synchronously, so submission
    // order is the call order.
    let (wait, mut guard) = {
      let mut state = self.state.rc_deref_mut();
      if state.busy {
        let (tx, rx) = oneshot::channel();
        state.pending.push_back(tx);
        (Some(rx), TurnGuard::new(self.state.clone(), false))
      } else {
        state.busy = true;
        (None, TurnGuard::new(self.state.clone(), true))
      }
    };

    let f = self.f.clone();
    let state = self.state.clone();
    Box::pin(async move {
      if let Some(rx) = wait {
        match rx.await {
          Ok(Turn::Run) => guard.held = true,
          Ok(Turn::Cancel) | Err(_) => return Outcome::Canceled,
        }
      }
      let epoch = state.rc_deref().epoch;
      let output = f(args).await;
      let canceled = state.rc_deref().epoch != epoch;
      // Hands the turn to the next queued entry.
      drop(guard);
      if canceled {
        Outcome::Canceled
      } else {
        Outcome::Value(output)
      }
    })
  }

  /// Entries submitted but not yet started.
  pub fn pending_count(&self) -> usize {
    self.state.rc_deref().pending.len()
  }

  /// Drop every not-yet-started entry, resolving each with
  /// `Outcome::Canceled` without invoking the wrapped function. The
  /// in-flight call, if any, still completes normally. The queue stays
  /// usable.
  pub fn clear(&self) {
    let drained: Vec<_> = {
      let mut state = self.state.rc_deref_mut();
      state.pending.drain(..).collect()
    };
    for tx in drained {
      let _ = tx.send(Turn::Cancel);
    }
  }

  /// [`clear`](Self::clear), and additionally discard delivery of the
  /// in-flight call's result: it resolves with `Outcome::Canceled` once its
  /// body finishes.
  pub fn cancel(&self) {
    self.clear();
    self.state.rc_deref_mut().epoch += 1;
  }
}
