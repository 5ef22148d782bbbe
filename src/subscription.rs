use smallvec::SmallVec;

use crate::rc::MutRc;

/// Handle returned from `subscribe`/`connect` calls to allow deregistering a
/// listener before its source is finished.
pub trait SubscriptionLike {
  /// Deregister the listener. Calling this more than once is a no-op.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

/// A one-shot, idempotent unsubscribe action.
///
/// Clones share the same state: whichever clone unsubscribes first wins, the
/// rest become no-ops.
#[derive(Default)]
pub struct Subscription(MutRc<Option<Box<dyn FnOnce()>>>);

impl Subscription {
  pub fn new(action: impl FnOnce() + 'static) -> Self {
    Self(MutRc::own(Some(Box::new(action))))
  }

  /// A subscription that does nothing on unsubscribe.
  pub fn empty() -> Self { Self(MutRc::own(None)) }

  /// Bundle several subscriptions into one that unsubscribes them all.
  pub fn join(subs: impl IntoIterator<Item = Subscription>) -> Self {
    let mut subs: SmallVec<[Subscription; 2]> = subs.into_iter().collect();
    Self::new(move || {
      for sub in subs.iter_mut() {
        sub.unsubscribe();
      }
    })
  }
}

impl Clone for Subscription {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe(&mut self) {
    let action = self.0.rc_deref_mut().take();
    if let Some(action) = action {
      action();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().is_none() }
}

/// Unsubscribes when dropped. Used by futures/streams that own a listener
/// registration, e.g. `Observer::to_promise` and `IteratorContext::iterate`.
pub(crate) struct SubscriptionGuard(pub(crate) Subscription);

impl Drop for SubscriptionGuard {
  fn drop(&mut self) { self.0.unsubscribe(); }
}
