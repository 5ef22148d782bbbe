use std::{collections::HashMap, future::Future, hash::Hash, rc::Rc};

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::rc::MutRc;

type SharedRun<T> = Shared<LocalBoxFuture<'static, T>>;
type KeyFn<A, K> = Rc<dyn Fn(&A) -> K>;
type WrappedFn<A, T> = Rc<dyn Fn(A) -> LocalBoxFuture<'static, T>>;

/// Caches the wrapped function's output per key derived from its
/// arguments. Concurrent calls with the same key share one run.
pub struct Memoized<A, K: Hash + Eq, T: Clone> {
  key_fn: KeyFn<A, K>,
  f: WrappedFn<A, T>,
  cache: MutRc<HashMap<K, SharedRun<T>>>,
}

impl<A, K: Hash + Eq, T: Clone> Clone for Memoized<A, K, T> {
  fn clone(&self) -> Self {
    Self {
      key_fn: self.key_fn.clone(),
      f: self.f.clone(),
      cache: self.cache.clone(),
    }
  }
}

pub fn memoize<A, K, T, KF, F, Fut>(key_fn: KF, f: F) -> Memoized<A, K, T>
where
  A: 'static,
  K: Hash + Eq + 'static,
  T: Clone + 'static,
  KF: Fn(&A) -> K + 'static,
  F: Fn(A) -> Fut + 'static,
  Fut: Future<Output = T> + 'static,
{
  Memoized {
    key_fn: Rc::new(key_fn),
    f: Rc::new(move |args| Box::pin(f(args))),
    cache: MutRc::own(HashMap::new()),
  }
}

impl<A: 'static, K: Hash + Eq + 'static, T: Clone + 'static>
  Memoized<A, K, T>
{
  pub fn call(&self, args: A) -> LocalBoxFuture<'static, T> {
    let key = (self.key_fn)(&args);
    let run = {
      let mut cache = self.cache.rc_deref_mut();
      cache
        .entry(key)
        .or_insert_with(|| (self.f)(args).shared())
        .clone()
    };
    Box::pin(run)
  }

  /// Seed the cache with an already-known value for `key`.
  pub fn add(&self, key: K, value: T) {
    let ready: LocalBoxFuture<'static, T> = Box::pin(async move { value });
    self.cache.rc_deref_mut().insert(key, ready.shared());
  }

  /// Drop one cached entry; returns whether it existed.
  pub fn remove(&self, key: &K) -> bool {
    self.cache.rc_deref_mut().remove(key).is_some()
  }

  pub fn has(&self, key: &K) -> bool {
    self.cache.rc_deref().contains_key(key)
  }

  /// Drop every cached entry.
  pub fn clear(&self) {
    self.cache.rc_deref_mut().clear();
  }
}
