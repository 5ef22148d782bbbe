use std::{future::Future, rc::Rc};

use futures::future::LocalBoxFuture;

use crate::{
  flow::{queued, Queued},
  outcome::Outcome,
  rc::MutRc,
  subject::BehaviorSubject,
};

/// Internal queue payload: a user call, or the barrier sentinel pushed by
/// `end_lock` to observe that the unlock has propagated through the queue.
enum LockCall<A> {
  User(A),
  Barrier,
}

struct DepthState {
  count: usize,
  gate: BehaviorSubject<usize>,
}

/// A reentrant pause/resume gate over a [`Queued`] wrapper.
///
/// While the depth counter is above zero no wrapped body executes; calls
/// keep queuing in FIFO order and run, in that order, once the depth
/// returns to zero. The gate is advisory ordering, not mutual exclusion
/// over parallel threads.
///
/// Note that `end_lock` resolves only once every call already queued ahead
/// of its barrier has completed; awaiting it while an outer `begin_lock`
/// still holds the gate open will therefore block until the lock fully
/// opens.
pub struct Lock<A, T> {
  queue: Queued<LockCall<A>, Option<T>>,
  depth: MutRc<DepthState>,
}

impl<A, T> Clone for Lock<A, T> {
  fn clone(&self) -> Self {
    Self { queue: self.queue.clone(), depth: self.depth.clone() }
  }
}

/// Wrap `f` behind a serialized queue and a reentrant depth gate.
pub fn lock<A, T, F, Fut>(f: F) -> Lock<A, T>
where
  A: 'static,
  T: 'static,
  F: Fn(A) -> Fut + 'static,
  Fut: Future<Output = T> + 'static,
{
  let depth = MutRc::own(DepthState {
    count: 0,
    gate: BehaviorSubject::new(0),
  });
  let f = Rc::new(f);
  let c_depth = depth.clone();
  let queue = queued(move |call: LockCall<A>| {
    let f = f.clone();
    let depth = c_depth.clone();
    async move {
      match call {
        // The barrier never waits on the gate: it exists to flush the
        // queue even while outer locks remain held.
        LockCall::Barrier => None,
        LockCall::User(args) => {
          loop {
            // Re-read the gate each round: `clear` may have replaced it.
            let gate = depth.rc_deref().gate.clone();
            if gate.data().unwrap_or(0) == 0 {
              break;
            }
            gate.to_observer().to_promise().await;
          }
          Some(f(args).await)
        }
      }
    }
  });
  Lock { queue, depth }
}

impl<A: 'static, T: 'static> Lock<A, T> {
  /// Funnel a call through the queue; its body runs only while the depth
  /// is zero.
  pub fn call(&self, args: A) -> LocalBoxFuture<'static, Outcome<T>> {
    let fut = self.queue.call(LockCall::User(args));
    Box::pin(async move {
      match fut.await {
        Outcome::Value(Some(value)) => Outcome::Value(value),
        Outcome::Value(None) | Outcome::Canceled => Outcome::Canceled,
      }
    })
  }

  /// Raise the depth and broadcast it to pending waiters.
  pub async fn begin_lock(&self) {
    let (gate, depth) = {
      let mut state = self.depth.rc_deref_mut();
      state.count += 1;
      (state.gate.clone(), state.count)
    };
    gate.next(depth).await;
  }

  /// Lower the depth (clamped at zero), broadcast it, then push a barrier
  /// through the queue and await it, so the returned future resolves only
  /// once the unlock has propagated through all already-queued work.
  pub async fn end_lock(&self) {
    let (gate, depth) = {
      let mut state = self.depth.rc_deref_mut();
      state.count = state.count.saturating_sub(1);
      (state.gate.clone(), state.count)
    };
    gate.next(depth).await;
    self.queue.call(LockCall::Barrier).await;
  }

  /// The current reentrancy depth.
  pub fn depth(&self) -> usize { self.depth.rc_deref().count }

  /// Reset the depth to zero, replace the broadcast object, and drop every
  /// queued call. Waiters parked on the old gate are woken so they observe
  /// the reset.
  pub async fn clear(&self) {
    let old_gate = {
      let mut state = self.depth.rc_deref_mut();
      state.count = 0;
      std::mem::replace(&mut state.gate, BehaviorSubject::new(0))
    };
    self.queue.clear();
    old_gate.next(0).await;
  }

  /// [`clear`](Self::clear) plus queue cancellation: the in-flight call's
  /// result is discarded.
  pub async fn cancel(&self) {
    self.queue.cancel();
    self.clear().await;
  }
}
