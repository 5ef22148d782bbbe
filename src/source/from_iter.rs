use crate::{observer::Observer, subscription::Subscription};

/// A cold source that emits every item of `iter`, in order, once the first
/// listener attaches.
///
/// Requires a running `LocalSet` at subscribe time.
pub fn from_iter<I>(iter: I) -> Observer<I::Item>
where
  I: IntoIterator + 'static,
  I::Item: Clone + 'static,
{
  Observer::with_connector(move |child| {
    tokio::task::spawn_local(async move {
      for value in iter {
        child.emit(value).await;
      }
    });
    Subscription::empty()
  })
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;

  #[tokio::test]
  async fn emits_all_items_in_order() {
    let local = tokio::task::LocalSet::new();
    local
      .run_until(async {
        let out = Rc::new(RefCell::new(vec![]));
        let c_out = out.clone();
        from_iter(1..=4)
          .map(|v| v * 2)
          .connect(move |v| c_out.borrow_mut().push(v));

        tokio::task::yield_now().await;
        assert_eq!(*out.borrow(), vec![2, 4, 6, 8]);
      })
      .await;
  }
}
