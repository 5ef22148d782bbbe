use crate::observer::Observer;

/// An emission annotated with its 1-based position in the stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counted<T> {
  pub value: T,
  pub count: usize,
}

/// Wrap each emission with its running emission count.
pub fn count<T: Clone + 'static>(
) -> impl FnOnce(Observer<T>) -> Observer<Counted<T>> {
  move |source| {
    let mut seen = 0;
    source.lift(move |value, out| {
      seen += 1;
      let counted = Counted { value, count: seen };
      Box::pin(async move { out.emit(counted).await })
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
  fn counts_from_one() {
    let subject = Subject::new();
    let out = Rc::new(RefCell::new(vec![]));
    let c_out = out.clone();
    subject
      .to_observer()
      .operator(count())
      .connect(move |v| c_out.borrow_mut().push(v));

    block_on(async {
      subject.next("a").await;
      subject.next("b").await;
    });
    assert_eq!(
      *out.borrow(),
      vec![
        Counted { value: "a", count: 1 },
        Counted { value: "b", count: 2 },
      ]
    );
  }
}
