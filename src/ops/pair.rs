use crate::observer::Observer;

/// Emit consecutive 2-tuples spaced `by` positions apart. `pair(1)` yields
/// adjacent pairs.
pub fn pair<T: Clone + 'static>(
  by: usize,
) -> impl FnOnce(Observer<T>) -> Observer<(T, T)> {
  move |source| {
    let mut history: Vec<T> = Vec::new();
    source.lift(move |value, out| {
      history.push(value.clone());
      let pair = (history.len() > by)
        .then(|| (history[history.len() - 1 - by].clone(), value));
      Box::pin(async move {
        if let Some(pair) = pair {
          out.emit(pair).await;
        }
      })
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use futures::executor::block_on;

  use super::*;
  use crate::subject::Subject;

  #[test]
  fn adjacent_pairs() {
    let subject = Subject::new();
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    subject
      .to_observer()
      .operator(pair(1))
      .connect(move |v| c_out.borrow_mut().push(v));

    block_on(async {
      for v in [1, 2, 3, 4] {
        subject.next(v).await;
      }
    });
    assert_eq!(*out.borrow(), vec![(1, 2), (2, 3), (3, 4)]);
  }

  #[test]
  fn spaced_pairs() {
    let subject = Subject::new();
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    subject
      .to_observer()
      .operator(pair(2))
      .connect(move |v| c_out.borrow_mut().push(v));

    block_on(async {
      for v in [1, 2, 3, 4] {
        subject.next(v).await;
      }
    });
    assert_eq!(*out.borrow(), vec![(1, 3), (2, 4)]);
  }
}
