use std::{cell::Cell, rc::Rc, time::Duration};

use tokio::time::Instant;

use crate::{observer::Observer, rc::MutRc, subscription::Subscription};

/// Dead-man's switch: if no emission occurs within `wait_for` of the last
/// one (or of subscription start), `fallback` fires once and the watchdog
/// stops. Every emission resets the timer and is forwarded unchanged.
///
/// Requires a running `LocalSet` (the watchdog is a spawned task).
pub fn liveness<T: Clone + 'static>(
  fallback: impl FnOnce() + 'static,
  wait_for: Duration,
) -> impl FnOnce(Observer<T>) -> Observer<T> {
  move |source| {
    Observer::with_connector(move |child| {
      let last_seen = MutRc::own(Instant::now());
      let alive = Rc::new(Cell::new(true));

      let c_last = last_seen.clone();
      let c_alive = alive.clone();
      tokio::task::spawn_local(async move {
        let mut fallback = Some(fallback);
        loop {
          let deadline = *c_last.rc_deref() + wait_for;
          tokio::time::sleep_until(deadline).await;
          if !c_alive.get() {
            return;
          }
          if Instant::now() >= *c_last.rc_deref() + wait_for {
            if let Some(fallback) = fallback.take() {
              fallback();
            }
            return;
          }
        }
      });

      let sub = source.connect_async(move |value| {
        *last_seen.rc_deref_mut() = Instant::now();
        let child = child.clone();
        Box::pin(async move { child.emit(value).await })
      });
      Subscription::join([sub, Subscription::new(move || alive.set(false))])
    })
  }
}
