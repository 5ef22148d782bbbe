use futures::future::LocalBoxFuture;

use crate::{observer::Observer, rc::MutRc, subscription::Subscription};

/// How [`join`] treats inputs that have not emitted yet.
pub struct JoinOptions<T> {
  race: bool,
  buffer: Vec<T>,
}

impl<T> JoinOptions<T> {
  /// Wait mode (the default): emission starts only once every input has
  /// emitted at least once.
  pub fn wait() -> Self { Self { race: false, buffer: Vec::new() } }

  /// Race mode: emit on the very first update, filling not-yet-emitted
  /// slots from `buffer` (one default per input, same order as the
  /// sources).
  pub fn race(buffer: Vec<T>) -> Self { Self { race: true, buffer } }
}

impl<T> Default for JoinOptions<T> {
  fn default() -> Self { Self::wait() }
}

/// Combine the latest value of each input into one full-width emission.
///
/// Every update from any input re-emits the whole slot vector, keeping
/// stale values in the other slots. In wait mode nothing is emitted until
/// all slots are filled; in race mode unfilled slots read from the
/// configured buffer.
pub fn join<T: Clone + 'static>(
  sources: Vec<Observer<T>>,
  options: JoinOptions<T>,
) -> Observer<Vec<T>> {
  let width = sources.len();
  let JoinOptions { race, buffer } = options;
  assert!(
    !race || buffer.len() == width,
    "race mode requires one buffer default per input"
  );

  Observer::with_connector(move |child| {
    let slots: MutRc<Vec<Option<T>>> = MutRc::own(vec![None; width]);
    let buffer = std::rc::Rc::new(buffer);
    let subs = sources.iter().enumerate().map(|(index, source)| {
      let child = child.clone();
      let slots = slots.clone();
      let buffer = buffer.clone();
      source.connect_async(move |value| -> LocalBoxFuture<'static, ()> {
        let combined = {
          let mut slots = slots.rc_deref_mut();
          slots[index] = Some(value);
          if race {
            Some(
              slots
                .iter()
                .enumerate()
                .map(|(i, slot)| {
                  slot.clone().unwrap_or_else(|| buffer[i].clone())
                })
                .collect::<Vec<T>>(),
            )
          } else if slots.iter().all(Option::is_some) {
            Some(slots.iter().map(|s| s.clone().unwrap()).collect())
          } else {
            None
          }
        };
        let child = child.clone();
        Box::pin(async move {
          if let Some(combined) = combined {
            child.emit(combined).await;
          }
        })
      })
    });
    Subscription::join(subs.collect::<Vec<_>>())
  })
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use futures::executor::block_on;

  use super::*;
  use crate::subject::Subject;

  #[test]
  fn wait_mode_emits_once_all_slots_fill() {
    let a = Subject::new();
    let b = Subject::new();
    let joined = join(
      vec![a.to_observer(), b.to_observer()],
      JoinOptions::wait(),
    );
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    joined.connect(move |v| c_out.borrow_mut().push(v));

    block_on(async {
      a.next(1).await;
      assert!(out.borrow().is_empty());
      b.next(2).await;
      a.next(3).await;
    });
    assert_eq!(*out.borrow(), vec![vec![1, 2], vec![3, 2]]);
  }

  #[test]
  fn race_mode_fills_missing_slots_from_buffer() {
    let a = Subject::new();
    let b = Subject::new();
    let joined = join(
      vec![a.to_observer(), b.to_observer()],
      JoinOptions::race(vec![0, 0]),
    );
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    joined.connect(move |v| c_out.borrow_mut().push(v));

    block_on(async {
      a.next(5).await;
      b.next(6).await;
    });
    assert_eq!(*out.borrow(), vec![vec![5, 0], vec![5, 6]]);
  }
}
