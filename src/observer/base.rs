use std::{cell::RefCell, rc::Rc};

use futures::future::{ready, FutureExt, LocalBoxFuture};
use smallvec::SmallVec;

use crate::{
  emitter::Listener,
  rc::MutRc,
  subscription::{Subscription, SubscriptionLike},
};

struct Entry<T> {
  id: usize,
  cb: Rc<RefCell<Listener<T>>>,
}

impl<T> Clone for Entry<T> {
  fn clone(&self) -> Self { Self { id: self.id, cb: self.cb.clone() } }
}

type Connector<T> = Box<dyn FnOnce(Observer<T>) -> Subscription>;

struct Inner<T> {
  listeners: SmallVec<[Entry<T>; 2]>,
  next_id: usize,
  shared: bool,
  disposed: bool,
  connector: Option<Connector<T>>,
  teardown: Option<Subscription>,
}

/// A subscribable, disposable handle over a push stream of values.
///
/// `Observer` is a cheap-to-clone `Rc` handle; clones control the same
/// stream. Derived observers returned by the transform operators are wired
/// to their parent lazily: attaching the first listener connects upstream,
/// detaching the last one (unless [`share`](Observer::share)d) tears the
/// connection down and disposes the observer.
///
/// Disposal fires exactly once. A disposed observer is never re-armed:
/// subscribing to it afterwards delivers nothing.
pub struct Observer<T> {
  inner: MutRc<Inner<T>>,
}

impl<T> Clone for Observer<T> {
  #[inline]
  fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<T: Clone + 'static> Default for Observer<T> {
  fn default() -> Self { Self::new() }
}

impl<T: Clone + 'static> Observer<T> {
  /// A root observer with no upstream. Values are pushed into it by source
  /// factories.
  pub fn new() -> Self {
    Self {
      inner: MutRc::own(Inner {
        listeners: SmallVec::new(),
        next_id: 0,
        shared: false,
        disposed: false,
        connector: None,
        teardown: None,
      }),
    }
  }

  /// A derived observer. `connector` runs when the first listener attaches
  /// and returns the teardown invoked on disposal.
  pub fn with_connector(
    connector: impl FnOnce(Observer<T>) -> Subscription + 'static,
  ) -> Self {
    let observer = Self::new();
    observer.inner.rc_deref_mut().connector = Some(Box::new(connector));
    observer
  }

  /// Subscribe with a synchronous callback.
  pub fn connect(&self, mut cb: impl FnMut(T) + 'static) -> Subscription {
    self.connect_async(move |value| {
      cb(value);
      ready(()).boxed_local()
    })
  }

  /// Subscribe with an asynchronous callback; emission on this observer
  /// settles only after the callback's future does.
  pub fn connect_async(
    &self,
    cb: impl FnMut(T) -> LocalBoxFuture<'static, ()> + 'static,
  ) -> Subscription {
    self.attach(Box::new(cb))
  }

  /// Subscribe for a single value, then unsubscribe with the same disposal
  /// accounting as a normal subscription.
  pub fn once(&self, cb: impl FnOnce(T) + 'static) -> Subscription {
    let slot = Rc::new(RefCell::new(None::<Subscription>));
    let cb_slot = Rc::new(RefCell::new(Some(cb)));
    let c_slot = slot.clone();
    let sub = self.connect(move |value| {
      if let Some(cb) = cb_slot.borrow_mut().take() {
        cb(value);
      }
      if let Some(mut sub) = c_slot.borrow_mut().take() {
        sub.unsubscribe();
      }
    });
    *slot.borrow_mut() = Some(sub.clone());
    sub
  }

  /// Mark this observer shared, preventing auto-disposal when the listener
  /// set drains. Mutates in place and returns the same instance.
  pub fn share(&self) -> Self {
    self.inner.rc_deref_mut().shared = true;
    self.clone()
  }

  /// Force disposal regardless of the shared flag: drop every listener and
  /// run the teardown. Idempotent; the only way to stop a shared observer,
  /// e.g. a hot source's producer.
  pub fn dispose(&self) {
    let teardown = {
      let mut inner = self.inner.rc_deref_mut();
      if inner.disposed {
        return;
      }
      inner.disposed = true;
      inner.listeners.clear();
      inner.connector = None;
      inner.teardown.take()
    };
    if let Some(mut teardown) = teardown {
      teardown.unsubscribe();
    }
  }

  #[inline]
  pub fn is_shared(&self) -> bool { self.inner.rc_deref().shared }

  #[inline]
  pub fn is_disposed(&self) -> bool { self.inner.rc_deref().disposed }

  pub fn listener_count(&self) -> usize {
    self.inner.rc_deref().listeners.len()
  }

  /// Generic extension point: `op` receives this observer and builds a new
  /// one. The `ops` module's operators all plug in through here.
  pub fn operator<U>(
    &self,
    op: impl FnOnce(Observer<T>) -> Observer<U>,
  ) -> Observer<U> {
    op(self.clone())
  }

  /// The primitive every transform operator is built on: a derived observer
  /// that, once subscribed to, feeds each parent value through `f` together
  /// with the derived handle to emit into.
  pub fn lift<U: Clone + 'static>(
    &self,
    mut f: impl FnMut(T, Observer<U>) -> LocalBoxFuture<'static, ()> + 'static,
  ) -> Observer<U> {
    let parent = self.clone();
    Observer::with_connector(move |child| {
      parent.connect_async(move |value| f(value, child.clone()))
    })
  }

  /// Deliver `value` to a snapshot of the current listeners, in
  /// subscription order, awaiting each callback.
  pub(crate) async fn emit(&self, value: T) {
    let snapshot: SmallVec<[Entry<T>; 2]> = {
      let inner = self.inner.rc_deref();
      if inner.disposed {
        return;
      }
      inner.listeners.clone()
    };
    for entry in snapshot {
      let fut = (entry.cb.borrow_mut())(value.clone());
      fut.await;
    }
  }

  pub(crate) fn set_teardown(&self, teardown: Subscription) {
    self.inner.rc_deref_mut().teardown = Some(teardown);
  }

  fn attach(&self, cb: Listener<T>) -> Subscription {
    let (id, connector) = {
      let mut inner = self.inner.rc_deref_mut();
      if inner.disposed {
        return Subscription::empty();
      }
      inner.next_id += 1;
      let id = inner.next_id;
      inner
        .listeners
        .push(Entry { id, cb: Rc::new(RefCell::new(cb)) });
      let connector = if inner.listeners.len() == 1 {
        inner.connector.take()
      } else {
        None
      };
      (id, connector)
    };
    if let Some(connector) = connector {
      let teardown = connector(self.clone());
      self.inner.rc_deref_mut().teardown = Some(teardown);
    }
    let observer = self.clone();
    Subscription::new(move || observer.detach(id))
  }

  fn detach(&self, id: usize) {
    let teardown = {
      let mut inner = self.inner.rc_deref_mut();
      let before = inner.listeners.len();
      inner.listeners.retain(|entry| entry.id != id);
      if inner.listeners.len() == before {
        return;
      }
      if !inner.listeners.is_empty() || inner.shared || inner.disposed {
        return;
      }
      inner.disposed = true;
      inner.connector = None;
      inner.teardown.take()
    };
    if let Some(mut teardown) = teardown {
      teardown.unsubscribe();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use futures::executor::block_on;

  use super::*;
  use crate::subscription::SubscriptionLike;

  fn counted_source(disposals: &Rc<Cell<u32>>) -> Observer<i32> {
    let disposals = disposals.clone();
    Observer::with_connector(move |_| {
      Subscription::new(move || disposals.set(disposals.get() + 1))
    })
  }

  #[test]
  fn dispose_fires_exactly_once() {
    let disposals = Rc::new(Cell::new(0));
    let observer = counted_source(&disposals);

    let mut sub = observer.connect(|_| {});
    assert_eq!(disposals.get(), 0);
    sub.unsubscribe();
    assert_eq!(disposals.get(), 1);
    sub.unsubscribe();
    assert_eq!(disposals.get(), 1);
    assert!(observer.is_disposed());
  }

  #[test]
  fn disposed_observer_is_never_rearmed() {
    let disposals = Rc::new(Cell::new(0));
    let observer = counted_source(&disposals);
    let mut sub = observer.connect(|_| {});
    sub.unsubscribe();

    let got = Rc::new(Cell::new(0));
    let c_got = got.clone();
    observer.connect(move |v| c_got.set(v));
    block_on(observer.emit(42));
    assert_eq!(got.get(), 0);
    assert_eq!(disposals.get(), 1);
  }

  #[test]
  fn shared_observer_survives_zero_listeners() {
    let disposals = Rc::new(Cell::new(0));
    let observer = counted_source(&disposals).share();

    let mut sub = observer.connect(|_| {});
    sub.unsubscribe();
    assert_eq!(disposals.get(), 0);
    assert!(!observer.is_disposed());

    let got = Rc::new(Cell::new(0));
    let c_got = got.clone();
    observer.connect(move |v| c_got.set(v));
    block_on(observer.emit(5));
    assert_eq!(got.get(), 5);
  }

  #[test]
  fn dispose_forces_teardown_on_shared_observer() {
    let disposals = Rc::new(Cell::new(0));
    let observer = counted_source(&disposals).share();
    observer.connect(|_| {});

    observer.dispose();
    assert_eq!(disposals.get(), 1);
    assert!(observer.is_disposed());
    assert_eq!(observer.listener_count(), 0);

    observer.dispose();
    assert_eq!(disposals.get(), 1);
  }

  #[test]
  fn once_delivers_single_value_and_detaches() {
    let observer = Observer::new().share();
    let got = Rc::new(RefCell::new(vec![]));
    let c_got = got.clone();
    observer.once(move |v: i32| c_got.borrow_mut().push(v));

    block_on(observer.emit(1));
    block_on(observer.emit(2));
    assert_eq!(*got.borrow(), vec![1]);
    assert_eq!(observer.listener_count(), 0);
  }

  #[test]
  fn lift_connects_lazily() {
    let connected = Rc::new(Cell::new(false));
    let c_connected = connected.clone();
    let source: Observer<i32> = Observer::with_connector(move |_| {
      c_connected.set(true);
      Subscription::empty()
    });

    let doubled = source.lift(|v: i32, out| {
      Box::pin(async move { out.emit(v * 2).await })
    });
    assert!(!connected.get());
    doubled.connect(|_| {});
    assert!(connected.get());
  }

  #[test]
  fn second_listener_does_not_reconnect() {
    let connects = Rc::new(Cell::new(0));
    let c_connects = connects.clone();
    let source: Observer<i32> = Observer::with_connector(move |_| {
      c_connects.set(c_connects.get() + 1);
      Subscription::empty()
    });
    source.connect(|_| {});
    source.connect(|_| {});
    assert_eq!(connects.get(), 1);
  }
}
