//! Value transforms on `Observer`. Each returns a new derived observer
//! lazily wired to its parent; no work happens until a subscriber attaches.

use std::{cell::RefCell, rc::Rc};

use futures::future::LocalBoxFuture;

use crate::{observer::Observer, subscription::Subscription};

/// `split` batch size for array-shaped emissions.
const SPLIT_CHUNK: usize = 20;

impl<T: Clone + 'static> Observer<T> {
  pub fn map<U: Clone + 'static>(
    &self,
    mut f: impl FnMut(T) -> U + 'static,
  ) -> Observer<U> {
    self.lift(move |value, out| {
      let mapped = f(value);
      Box::pin(async move { out.emit(mapped).await })
    })
  }

  /// Map each value to a batch of values, emitted one by one in order.
  pub fn flat_map<U: Clone + 'static>(
    &self,
    mut f: impl FnMut(T) -> Vec<U> + 'static,
  ) -> Observer<U> {
    self.lift(move |value, out| {
      let batch = f(value);
      Box::pin(async move {
        for item in batch {
          out.emit(item).await;
        }
      })
    })
  }

  pub fn filter(
    &self,
    mut predicate: impl FnMut(&T) -> bool + 'static,
  ) -> Observer<T> {
    self.lift(move |value, out| {
      let keep = predicate(&value);
      Box::pin(async move {
        if keep {
          out.emit(value).await;
        }
      })
    })
  }

  /// Emit the running accumulation on every source emission.
  pub fn reduce<U: Clone + 'static>(
    &self,
    seed: U,
    mut f: impl FnMut(U, T) -> U + 'static,
  ) -> Observer<U> {
    let mut acc = seed;
    self.lift(move |value, out| {
      acc = f(acc.clone(), value);
      let current = acc.clone();
      Box::pin(async move { out.emit(current).await })
    })
  }

  /// Observe values without altering the stream.
  pub fn tap(&self, mut f: impl FnMut(&T) + 'static) -> Observer<T> {
    self.lift(move |value, out| {
      f(&value);
      Box::pin(async move { out.emit(value).await })
    })
  }

  /// Map through an asynchronous, fallible mapper. A mapper error is routed
  /// to `fallback` (if any) and the emission is suppressed, so one failed
  /// transformation does not terminate the stream.
  pub fn map_async<U, E, Fut>(
    &self,
    mut f: impl FnMut(T) -> Fut + 'static,
    fallback: Option<Box<dyn FnMut(E)>>,
  ) -> Observer<U>
  where
    U: Clone + 'static,
    E: 'static,
    Fut: std::future::Future<Output = Result<U, E>> + 'static,
  {
    let fallback = Rc::new(RefCell::new(fallback));
    self.lift(move |value, out| {
      let fut = f(value);
      let fallback = fallback.clone();
      Box::pin(async move {
        match fut.await {
          Ok(mapped) => out.emit(mapped).await,
          Err(err) => {
            if let Some(fallback) = fallback.borrow_mut().as_mut() {
              fallback(err);
            }
          }
        }
      })
    })
  }

  /// Fan in another observer of the same item type. Values are forwarded as
  /// they arrive, with no ordering guarantee across the two sources.
  pub fn merge(&self, other: &Observer<T>) -> Observer<T> {
    let left = self.clone();
    let right = other.clone();
    Observer::with_connector(move |child| {
      let forward = |child: Observer<T>| {
        move |value: T| -> LocalBoxFuture<'static, ()> {
          let child = child.clone();
          Box::pin(async move { child.emit(value).await })
        }
      };
      let a = left.connect_async(forward(child.clone()));
      let b = right.connect_async(forward(child));
      Subscription::join([a, b])
    })
  }
}

impl<U: Clone + 'static> Observer<Vec<U>> {
  /// Batch each array-shaped emission into fixed-size chunks of 20
  /// elements, preserving element order; the last chunk may be shorter.
  pub fn split(&self) -> Observer<Vec<U>> {
    self.lift(move |value: Vec<U>, out| {
      Box::pin(async move {
        for chunk in value.chunks(SPLIT_CHUNK) {
          out.emit(chunk.to_vec()).await;
        }
      })
    })
  }
}

#[cfg(test)]
mod tests {
  use futures::executor::block_on;

  use super::*;
  use crate::subject::Subject;

  fn collect<T: Clone + 'static>(observer: &Observer<T>) -> Rc<RefCell<Vec<T>>> {
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    observer.connect(move |v| c_out.borrow_mut().push(v));
    out
  }

  #[test]
  fn map_filter_chain() {
    let subject = Subject::new();
    let derived = subject
      .to_observer()
      .map(|v: i32| v * 2)
      .filter(|v| *v > 2);
    let out = collect(&derived);

    block_on(async {
      for v in [1, 2, 3] {
        subject.next(v).await;
      }
    });
    assert_eq!(*out.borrow(), vec![4, 6]);
  }

  #[test]
  fn reduce_emits_running_accumulation() {
    let subject = Subject::new();
    let sums = subject.to_observer().reduce(0, |acc, v: i32| acc + v);
    let out = collect(&sums);

    block_on(async {
      for v in [1, 2, 3] {
        subject.next(v).await;
      }
    });
    assert_eq!(*out.borrow(), vec![1, 3, 6]);
  }

  #[test]
  fn flat_map_emits_in_order() {
    let subject = Subject::new();
    let spread = subject.to_observer().flat_map(|v: i32| vec![v, v + 10]);
    let out = collect(&spread);

    block_on(subject.next(1));
    assert_eq!(*out.borrow(), vec![1, 11]);
  }

  #[test]
  fn tap_sees_every_value_unchanged() {
    let subject = Subject::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    let tapped = subject.to_observer().tap(move |v: &i32| {
      c_seen.borrow_mut().push(*v);
    });
    let out = collect(&tapped);

    block_on(subject.next(9));
    assert_eq!(*seen.borrow(), vec![9]);
    assert_eq!(*out.borrow(), vec![9]);
  }

  #[test]
  fn map_async_routes_errors_to_fallback() {
    let subject = Subject::new();
    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    let mapped = subject.to_observer().map_async(
      |v: i32| async move { if v % 2 == 0 { Ok(v * 10) } else { Err(v) } },
      Some(Box::new(move |e| c_errors.borrow_mut().push(e))),
    );
    let out = collect(&mapped);

    block_on(async {
      for v in [1, 2, 3, 4] {
        subject.next(v).await;
      }
    });
    assert_eq!(*out.borrow(), vec![20, 40]);
    assert_eq!(*errors.borrow(), vec![1, 3]);
  }

  #[test]
  fn merge_interleaves_by_arrival() {
    let a = Subject::new();
    let b = Subject::new();
    let merged = a.to_observer().merge(&b.to_observer());
    let out = collect(&merged);

    block_on(async {
      a.next(1).await;
      b.next(2).await;
      a.next(3).await;
    });
    assert_eq!(*out.borrow(), vec![1, 2, 3]);
  }

  #[test]
  fn split_chunks_arrays_of_twenty() {
    let subject = Subject::new();
    let chunks = subject.to_observer().split();
    let out = collect(&chunks);

    block_on(subject.next((0..45).collect::<Vec<i32>>()));
    let out = out.borrow();
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].len(), 20);
    assert_eq!(out[1].len(), 20);
    assert_eq!(out[2], (40..45).collect::<Vec<i32>>());
    assert_eq!(out[0][0], 0);
    assert_eq!(out[2][4], 44);
  }
}
