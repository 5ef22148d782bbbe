use crate::observer::Observer;

/// Drop the first `count` emissions, forward the rest.
pub fn skip<T: Clone + 'static>(
  count: usize,
) -> impl FnOnce(Observer<T>) -> Observer<T> {
  move |source| {
    let mut seen = 0;
    source.lift(move |value, out| {
      let forward = seen >= count;
      if !forward {
        seen += 1;
      }
      Box::pin(async move {
        if forward {
          out.emit(value).await;
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
  fn drops_first_n() {
    let subject = Subject::new();
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    subject
      .to_observer()
      .operator(skip(3))
      .connect(move |v| c_out.borrow_mut().push(v));

    block_on(async {
      for v in 1..=5 {
        subject.next(v).await;
      }
    });
    assert_eq!(*out.borrow(), vec![4, 5]);
  }
}
