use futures::future::LocalBoxFuture;

use crate::{
  observer::Observer,
  rc::MutRc,
  subject::Subject,
  subscription::Subscription,
};

/// A [`Subject`] that additionally retains its most recent value and exposes
/// it synchronously through [`data`](BehaviorSubject::data).
///
/// `next` updates the cell before notifying, so a subscriber callback that
/// reads `data()` always sees the value being delivered (or a newer one).
/// New listeners get no synchronous replay; current state is read via
/// `data()`.
pub struct BehaviorSubject<T> {
  subject: Subject<T>,
  cell: MutRc<Option<T>>,
}

impl<T> Clone for BehaviorSubject<T> {
  #[inline]
  fn clone(&self) -> Self {
    Self { subject: self.subject.clone(), cell: self.cell.clone() }
  }
}

impl<T: Clone + 'static> Default for BehaviorSubject<T> {
  fn default() -> Self { Self::empty() }
}

impl<T: Clone + 'static> BehaviorSubject<T> {
  /// A behavior subject seeded with an initial value.
  pub fn new(seed: T) -> Self {
    Self { subject: Subject::new(), cell: MutRc::own(Some(seed)) }
  }

  /// A behavior subject whose cell starts empty.
  pub fn empty() -> Self {
    Self { subject: Subject::new(), cell: MutRc::own(None) }
  }

  /// The current cell value.
  pub fn data(&self) -> Option<T> { self.cell.rc_deref().clone() }

  /// Update the cell, then notify subscribers.
  pub async fn next(&self, data: T) {
    *self.cell.rc_deref_mut() = Some(data.clone());
    self.subject.next(data).await;
  }

  pub fn subscribe(&self, cb: impl FnMut(T) + 'static) -> Subscription {
    self.subject.subscribe(cb)
  }

  pub fn subscribe_async(
    &self,
    cb: impl FnMut(T) -> LocalBoxFuture<'static, ()> + 'static,
  ) -> Subscription {
    self.subject.subscribe_async(cb)
  }

  pub fn once(&self, cb: impl FnOnce(T) + 'static) -> Subscription {
    self.subject.once(cb)
  }

  pub fn unsubscribe_all(&self) { self.subject.unsubscribe_all(); }

  pub fn listener_count(&self) -> usize { self.subject.listener_count() }

  pub fn to_observer(&self) -> Observer<T> { self.subject.to_observer() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use futures::executor::block_on;

  use super::*;

  #[test]
  fn cell_updates_before_notification() {
    let subject = BehaviorSubject::empty();
    let seen = Rc::new(RefCell::new(None));
    let c_subject = subject.clone();
    let c_seen = seen.clone();
    subject.subscribe(move |_: i32| {
      *c_seen.borrow_mut() = c_subject.data();
    });

    block_on(subject.next(3));
    assert_eq!(*seen.borrow(), Some(3));
    assert_eq!(subject.data(), Some(3));
  }

  #[test]
  fn seeded_value_is_readable_synchronously() {
    let subject = BehaviorSubject::new(10);
    assert_eq!(subject.data(), Some(10));
    block_on(subject.next(11));
    assert_eq!(subject.data(), Some(11));
  }

  #[test]
  fn observer_view_chains_operators() {
    let subject = BehaviorSubject::empty();
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    subject
      .to_observer()
      .map(|v: i32| v + 1)
      .connect(move |v| c_out.borrow_mut().push(v));

    block_on(subject.next(1));
    block_on(subject.next(2));
    assert_eq!(*out.borrow(), vec![2, 3]);
  }
}
