//! Keyed, ordered multi-listener pub/sub. The substrate `Subject` is built
//! on.

use std::{cell::RefCell, collections::HashMap, hash::Hash, rc::Rc};

use futures::future::{ready, FutureExt, LocalBoxFuture};
use smallvec::SmallVec;

use crate::{rc::MutRc, subscription::Subscription};

/// An event listener. Listeners are asynchronous so that an emission can be
/// awaited until every callback body has settled.
pub type Listener<T> = Box<dyn FnMut(T) -> LocalBoxFuture<'static, ()>>;

struct Handler<T> {
  id: usize,
  cb: Rc<RefCell<Listener<T>>>,
}

impl<T> Clone for Handler<T> {
  fn clone(&self) -> Self { Self { id: self.id, cb: self.cb.clone() } }
}

struct Inner<K, T> {
  channels: HashMap<K, SmallVec<[Handler<T>; 2]>>,
  next_id: usize,
}

/// Ordered pub/sub over event keys.
///
/// Listeners fire in subscription order for a given key. `emit` operates
/// over a snapshot of the listener list taken at call time: listeners added
/// during an emission are not invoked for that emission, and removals do not
/// affect the in-flight snapshot.
pub struct EventEmitter<K, T> {
  inner: MutRc<Inner<K, T>>,
}

impl<K, T> Clone for EventEmitter<K, T> {
  #[inline]
  fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<K, T> Default for EventEmitter<K, T>
where
  K: Eq + Hash + Clone + 'static,
  T: Clone + 'static,
{
  fn default() -> Self { Self::new() }
}

impl<K, T> EventEmitter<K, T>
where
  K: Eq + Hash + Clone + 'static,
  T: Clone + 'static,
{
  pub fn new() -> Self {
    Self {
      inner: MutRc::own(Inner { channels: HashMap::new(), next_id: 0 }),
    }
  }

  fn alloc_id(&self) -> usize {
    let mut inner = self.inner.rc_deref_mut();
    inner.next_id += 1;
    inner.next_id
  }

  fn insert(&self, key: K, id: usize, cb: Listener<T>) {
    let handler = Handler { id, cb: Rc::new(RefCell::new(cb)) };
    self
      .inner
      .rc_deref_mut()
      .channels
      .entry(key)
      .or_default()
      .push(handler);
  }

  fn remove(&self, key: &K, id: usize) {
    let mut inner = self.inner.rc_deref_mut();
    if let Some(handlers) = inner.channels.get_mut(key) {
      handlers.retain(|h| h.id != id);
      if handlers.is_empty() {
        inner.channels.remove(key);
      }
    }
  }

  /// Register a listener for `key`, ordered after all existing listeners.
  pub fn on(
    &self,
    key: K,
    cb: impl FnMut(T) -> LocalBoxFuture<'static, ()> + 'static,
  ) -> Subscription {
    let id = self.alloc_id();
    self.insert(key.clone(), id, Box::new(cb));
    let emitter = self.clone();
    Subscription::new(move || emitter.remove(&key, id))
  }

  /// Register a listener that deregisters itself before its first
  /// invocation runs, so a reentrant emission cannot fire it twice.
  pub fn once(
    &self,
    key: K,
    cb: impl FnOnce(T) -> LocalBoxFuture<'static, ()> + 'static,
  ) -> Subscription {
    let id = self.alloc_id();
    let emitter = self.clone();
    let k = key.clone();
    let slot = Rc::new(RefCell::new(Some(cb)));
    let wrapper: Listener<T> = Box::new(move |value| {
      emitter.remove(&k, id);
      match slot.borrow_mut().take() {
        Some(cb) => cb(value),
        None => ready(()).boxed_local(),
      }
    });
    self.insert(key.clone(), id, wrapper);
    let emitter = self.clone();
    Subscription::new(move || emitter.remove(&key, id))
  }

  /// Notify all listeners of `key` in subscription order.
  ///
  /// Resolves only after every listener callback has run to completion.
  pub async fn emit(&self, key: &K, value: T) {
    let snapshot: SmallVec<[Handler<T>; 2]> = self
      .inner
      .rc_deref()
      .channels
      .get(key)
      .cloned()
      .unwrap_or_default();
    for handler in snapshot {
      let fut = (handler.cb.borrow_mut())(value.clone());
      fut.await;
    }
  }

  pub fn listener_count(&self, key: &K) -> usize {
    self
      .inner
      .rc_deref()
      .channels
      .get(key)
      .map_or(0, |handlers| handlers.len())
  }

  /// Drop every listener of `key`.
  pub fn off_all(&self, key: &K) {
    self.inner.rc_deref_mut().channels.remove(key);
  }

  /// Drop every listener of every key.
  pub fn clear(&self) { self.inner.rc_deref_mut().channels.clear(); }
}
