//! Timer-driven operators. These spawn background tasks with
//! `tokio::task::spawn_local` and therefore require a running `LocalSet`.

use std::{cell::Cell, rc::Rc, time::Duration};

use futures::StreamExt;

use crate::{observer::Observer, subscription::Subscription};

struct DebounceState<T> {
  generation: u64,
  value: Option<T>,
}

impl<T: Clone + 'static> Observer<T> {
  /// Trailing-edge debounce: a value is forwarded only once `delay` elapses
  /// with no newer value arriving; newer values restart the timer and drop
  /// the superseded one.
  pub fn debounce(&self, delay: Duration) -> Observer<T> {
    let source = self.clone();
    Observer::with_connector(move |child| {
      let state = crate::rc::MutRc::own(DebounceState {
        generation: 0,
        value: None,
      });
      source.connect(move |value| {
        let generation = {
          let mut state = state.rc_deref_mut();
          state.generation += 1;
          state.value = Some(value);
          state.generation
        };
        let state = state.clone();
        let child = child.clone();
        tokio::task::spawn_local(async move {
          tokio::time::sleep(delay).await;
          let latest = {
            let mut state = state.rc_deref_mut();
            if state.generation == generation {
              state.value.take()
            } else {
              None
            }
          };
          if let Some(value) = latest {
            child.emit(value).await;
          }
        });
      })
    })
  }

  /// Forward every value after a fixed wait, preserving order.
  pub fn delay(&self, delay: Duration) -> Observer<T> {
    let source = self.clone();
    Observer::with_connector(move |child| {
      let (tx, mut rx) = futures::channel::mpsc::unbounded::<T>();
      // One worker keeps the waits sequential so emissions cannot reorder.
      tokio::task::spawn_local(async move {
        while let Some(value) = rx.next().await {
          tokio::time::sleep(delay).await;
          child.emit(value).await;
        }
      });
      source.connect(move |value| {
        let _ = tx.unbounded_send(value);
      })
    })
  }

  /// Re-emit the most recent value on a fixed interval, regardless of new
  /// pushes arriving in between.
  pub fn repeat(&self, interval: Duration) -> Observer<T> {
    let source = self.clone();
    Observer::with_connector(move |child| {
      let latest = crate::rc::MutRc::own(None::<T>);
      let alive = Rc::new(Cell::new(true));

      let c_latest = latest.clone();
      let c_alive = alive.clone();
      tokio::task::spawn_local(async move {
        loop {
          tokio::time::sleep(interval).await;
          if !c_alive.get() {
            break;
          }
          let value = c_latest.rc_deref().clone();
          if let Some(value) = value {
            child.emit(value).await;
          }
        }
      });

      let sub = source.connect(move |value| {
        *latest.rc_deref_mut() = Some(value);
      });
      Subscription::join([sub, Subscription::new(move || alive.set(false))])
    })
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;
  use crate::subject::Subject;

  fn collect<T: Clone + 'static>(observer: &Observer<T>) -> Rc<RefCell<Vec<T>>> {
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    observer.connect(move |v| c_out.borrow_mut().push(v));
    out
  }

  #[tokio::test(start_paused = true)]
  async fn debounce_keeps_only_the_last_of_a_burst() {
    let local = tokio::task::LocalSet::new();
    local
      .run_until(async {
        let subject = Subject::new();
        let debounced = subject.to_observer().debounce(Duration::from_millis(50));
        let out = collect(&debounced);

        subject.next(1).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        subject.next(2).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        subject.next(3).await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(*out.borrow(), vec![3]);

        subject.next(4).await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(*out.borrow(), vec![3, 4]);
      })
      .await;
  }

  #[tokio::test(start_paused = true)]
  async fn delay_preserves_order() {
    let local = tokio::task::LocalSet::new();
    local
      .run_until(async {
        let subject = Subject::new();
        let delayed = subject.to_observer().delay(Duration::from_millis(20));
        let out = collect(&delayed);

        subject.next(1).await;
        subject.next(2).await;
        subject.next(3).await;
        assert!(out.borrow().is_empty());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(*out.borrow(), vec![1, 2, 3]);
      })
      .await;
  }

  #[tokio::test(start_paused = true)]
  async fn repeat_re_emits_latest_on_interval() {
    let local = tokio::task::LocalSet::new();
    local
      .run_until(async {
        let subject = Subject::new();
        let repeated = subject.to_observer().repeat(Duration::from_millis(30));
        let out = collect(&repeated);

        subject.next(7).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(out.borrow().len() >= 2);
        assert!(out.borrow().iter().all(|v| *v == 7));

        subject.next(8).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(*out.borrow().last().unwrap(), 8);
      })
      .await;
  }
}
