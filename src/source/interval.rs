use std::{cell::Cell, rc::Rc, time::Duration};

use crate::{observer::Observer, subscription::Subscription};

/// A cold tick source: once subscribed, emits 0, 1, 2, ... every `period`.
///
/// Requires a running `LocalSet` at subscribe time.
pub fn from_interval(period: Duration) -> Observer<usize> {
  Observer::with_connector(move |child| {
    let alive = Rc::new(Cell::new(true));
    let c_alive = alive.clone();
    tokio::task::spawn_local(async move {
      let mut tick = 0;
      loop {
        tokio::time::sleep(period).await;
        if !c_alive.get() {
          break;
        }
        child.emit(tick).await;
        tick += 1;
      }
    });
    Subscription::new(move || alive.set(false))
  })
}
