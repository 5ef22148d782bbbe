use futures::future::LocalBoxFuture;

use crate::{observer::Observer, subscription::Subscription};

/// Fan in every emission from every input, interleaved by arrival. No
/// ordering guarantee holds across inputs.
pub fn merge<T: Clone + 'static>(sources: Vec<Observer<T>>) -> Observer<T> {
  Observer::with_connector(move |child| {
    let subs = sources.iter().map(|source| {
      let child = child.clone();
      source.connect_async(move |value| -> LocalBoxFuture<'static, ()> {
        let child = child.clone();
        Box::pin(async move { child.emit(value).await })
      })
    });
    Subscription::join(subs.collect::<Vec<_>>())
  })
}
